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

//! Lifecycle events delivered by the host and signals emitted by the engine.

pub mod bus;

pub use bus::SignalBus;

use crate::lifecycle::EngineState;
use crate::surface::NativeSurface;

/// A lifecycle event translated 1:1 from a host callback.
///
/// Immutable once enqueued. Variants carrying a surface own it exclusively,
/// which is why this type is deliberately not `Clone`.
#[derive(Debug)]
pub enum LifecycleEvent {
    /// The host created a native surface; the engine may start rendering.
    SurfaceCreated(Box<dyn NativeSurface>),
    /// The surface was recreated or resized; rebind before the next frame.
    SurfaceChanged {
        /// Replacement handle for the previous surface.
        surface: Box<dyn NativeSurface>,
        /// New drawable width in physical pixels.
        width: u32,
        /// New drawable height in physical pixels.
        height: u32,
    },
    /// The surface is gone and must not be touched after this event.
    SurfaceDestroyed,
    /// The host window gained input focus.
    FocusGained,
    /// The host window lost input focus.
    FocusLost,
    /// The host is moving the application to the background.
    Pause,
    /// The host is bringing the application back to the foreground.
    Resume,
    /// The host is tearing the process down. Terminal, and never dropped by
    /// the queue-overflow policy.
    DestroyRequested,
}

impl LifecycleEvent {
    /// Whether the queue-overflow policy must never drop this event.
    ///
    /// Losing a teardown event means rendering against a dead surface, so
    /// these evict older traffic instead of giving way themselves.
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::SurfaceDestroyed | Self::DestroyRequested)
    }

    /// Short name used in logs and overflow reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SurfaceCreated(_) => "SurfaceCreated",
            Self::SurfaceChanged { .. } => "SurfaceChanged",
            Self::SurfaceDestroyed => "SurfaceDestroyed",
            Self::FocusGained => "FocusGained",
            Self::FocusLost => "FocusLost",
            Self::Pause => "Pause",
            Self::Resume => "Resume",
            Self::DestroyRequested => "DestroyRequested",
        }
    }
}

/// Outward notification emitted by the engine thread.
///
/// Hosts and tests subscribe to these through the [`SignalBus`]; the engine
/// never waits on a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeSignal {
    /// The lifecycle state machine committed a transition.
    StateChanged {
        /// State before the event was applied.
        from: EngineState,
        /// State after the event was applied.
        to: EngineState,
    },
    /// The engine thread finished its drain and released all resources.
    Terminated,
}
