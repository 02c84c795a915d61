// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Generic engine-to-observer signal channel.

use log;

/// Thread-safe channel for signals leaving the engine thread.
///
/// Generic over the signal type `T` so this crate stays decoupled from the
/// concrete notifications higher layers define. Subscribers receive owned
/// handles; note that multiple subscribers compete for signals rather than
/// each seeing every one, so a bridge normally keeps a single logical
/// observer per bus.
#[derive(Debug)]
pub struct SignalBus<T: Send + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Send + 'static> SignalBus<T> {
    /// Creates a new bus backed by an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Publishes a signal without blocking.
    ///
    /// A fully disconnected subscriber side is logged and otherwise ignored;
    /// the engine never fails because nobody is listening.
    pub fn publish(&self, signal: T) {
        if self.sender.send(signal).is_err() {
            log::trace!("Signal dropped: all subscribers disconnected.");
        }
    }

    /// Hands out an owned receiver for the signal stream.
    pub fn subscribe(&self) -> flume::Receiver<T> {
        self.receiver.clone()
    }

    /// Returns a clone of the sender end, for publishers outside the bus
    /// owner.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }
}

impl<T: Send + 'static> Default for SignalBus<T> {
    fn default() -> Self {
        Self::new()
    }
}
