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

//! # Neko Core
//!
//! Foundational crate for the Neko lifecycle bridge: the host event model,
//! the lifecycle state machine, surface handle contracts, frame timing types,
//! and the error hierarchy shared by the runtime and the host boundary.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod event;
pub mod frame;
pub mod lifecycle;
pub mod surface;

pub use config::EngineConfig;
pub use event::{BridgeSignal, LifecycleEvent};
pub use frame::{FrameClock, FrameTick};
pub use lifecycle::{EngineState, LifecycleMachine};
pub use surface::NativeSurface;
