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

//! Bounded lifecycle-event queue between the host and the engine thread.
//!
//! A channel crate cannot express the overflow policy here (evicting the
//! oldest *non-critical* entry needs mid-queue removal), so this queue is
//! built directly on a mutex-guarded deque with a condvar for the consumer
//! side. FIFO order is preserved for everything that survives the policy.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use neko_core::event::LifecycleEvent;

/// Error returned by [`EventQueue::push`] when the overflow policy engaged.
///
/// The policy always recovers locally: `dropped` names the entry that gave
/// way. When a critical event evicts older traffic, or a non-critical push
/// displaces an older non-critical entry, the pushed event itself was still
/// enqueued — `dropped` names the pushed event only when nothing could give
/// way for it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("lifecycle event queue at capacity ({capacity}); dropped {dropped}")]
pub struct QueueFull {
    /// Configured capacity at the time of the push.
    pub capacity: usize,
    /// Log name of the event that was dropped.
    pub dropped: &'static str,
}

/// Error returned by [`EventQueue::pop_timeout`] when no event arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no lifecycle event arrived within {0:?}")]
pub struct PopTimeout(
    /// The timeout that elapsed.
    pub Duration,
);

/// Bounded FIFO carrying host events into the engine thread.
///
/// Producers are the host callback threads; the engine thread is the only
/// consumer. Overflow applies the drop-oldest-non-critical policy:
/// [`SurfaceDestroyed`](LifecycleEvent::SurfaceDestroyed) and
/// [`DestroyRequested`](LifecycleEvent::DestroyRequested) are never dropped,
/// transiently exceeding capacity if every queued entry is itself critical.
#[derive(Debug)]
pub struct EventQueue {
    items: Mutex<VecDeque<LifecycleEvent>>,
    available: Condvar,
    capacity: usize,
}

impl EventQueue {
    /// Creates a queue holding at most `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            available: Condvar::new(),
            capacity: capacity.max(1),
        }
    }

    /// The configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of events currently queued.
    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    /// Whether the queue is currently empty.
    pub fn is_empty(&self) -> bool {
        self.items.lock().unwrap().is_empty()
    }

    /// Enqueues `event` without blocking.
    ///
    /// Returns [`QueueFull`] whenever the overflow policy had to drop an
    /// entry; the error is informational and meant for the caller's log,
    /// never for the host.
    pub fn push(&self, event: LifecycleEvent) -> Result<(), QueueFull> {
        let mut items = self.items.lock().unwrap();

        if items.len() < self.capacity {
            items.push_back(event);
            drop(items);
            self.available.notify_one();
            return Ok(());
        }

        // At capacity: the oldest non-critical entry gives way.
        let victim = items.iter().position(|queued| !queued.is_critical());
        let result = match victim {
            Some(index) => {
                let evicted = items
                    .remove(index)
                    .map(|e| e.name())
                    .unwrap_or("<missing>");
                items.push_back(event);
                Err(QueueFull {
                    capacity: self.capacity,
                    dropped: evicted,
                })
            }
            None if event.is_critical() => {
                // Every queued entry is critical; grow past capacity rather
                // than lose a teardown event.
                items.push_back(event);
                Ok(())
            }
            None => Err(QueueFull {
                capacity: self.capacity,
                dropped: event.name(),
            }),
        };

        drop(items);
        self.available.notify_one();
        result
    }

    /// Removes and returns the next event without blocking.
    pub fn try_pop(&self) -> Option<LifecycleEvent> {
        self.items.lock().unwrap().pop_front()
    }

    /// Removes and returns the next event, waiting up to `timeout`.
    ///
    /// Called only by the engine thread; the timeout exists for tick-rate
    /// control, not cancellation.
    pub fn pop_timeout(&self, timeout: Duration) -> Result<LifecycleEvent, PopTimeout> {
        let deadline = Instant::now() + timeout;
        let mut items = self.items.lock().unwrap();

        loop {
            if let Some(event) = items.pop_front() {
                return Ok(event);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(PopTimeout(timeout));
            }

            let (guard, wait) = self.available.wait_timeout(items, remaining).unwrap();
            items = guard;
            if wait.timed_out() && items.is_empty() {
                return Err(PopTimeout(timeout));
            }
        }
    }
}
