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

//! # Neko Runtime
//!
//! Engine-thread runtime for the lifecycle bridge: the bounded event queue
//! between the host and the engine, the exclusive surface binding, the frame
//! driver, and the service that composes them on a dedicated thread.

#![warn(missing_docs)]

pub mod binding;
pub mod driver;
pub mod queue;
pub mod service;
pub mod stats;

pub use binding::SurfaceBinding;
pub use driver::{EngineApp, FrameDriver};
pub use queue::EventQueue;
pub use service::EngineService;
