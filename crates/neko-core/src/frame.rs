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

//! Frame timing: the per-iteration tick value and the clock producing it.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// One frame's timing snapshot.
///
/// Ephemeral: produced once per tick, handed to the app hooks, optionally
/// copied onto the stats feed, and never persisted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameTick {
    /// Monotonically increasing frame counter, starting at 1. Keeps counting
    /// across suspensions.
    pub index: u64,
    /// Seconds since the clock was last restarted.
    pub elapsed_secs: f64,
    /// Seconds since the previous tick, clamped to the configured maximum.
    pub delta_secs: f32,
}

/// Produces [`FrameTick`]s for the frame driver.
///
/// The clock restarts its delta baseline on resume so a suspension gap never
/// surfaces as one giant delta, and clamps each delta so a stall cannot
/// produce a runaway simulation step.
#[derive(Debug)]
pub struct FrameClock {
    started: Instant,
    last: Instant,
    index: u64,
    max_delta: Duration,
}

impl FrameClock {
    /// Creates a clock whose deltas never exceed `max_delta`.
    pub fn new(max_delta: Duration) -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last: now,
            index: 0,
            max_delta,
        }
    }

    /// Restarts the delta baseline at a resume boundary.
    ///
    /// Frame indices keep counting; only the elapsed/delta origins reset.
    pub fn restart(&mut self) {
        let now = Instant::now();
        self.started = now;
        self.last = now;
    }

    /// Advances the clock by one frame and returns its snapshot.
    pub fn tick(&mut self) -> FrameTick {
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last);
        let delta = raw_delta.min(self.max_delta);

        self.last = now;
        self.index += 1;

        FrameTick {
            index: self.index,
            elapsed_secs: now.duration_since(self.started).as_secs_f64(),
            delta_secs: delta.as_secs_f32(),
        }
    }

    /// Number of ticks produced so far.
    pub fn index(&self) -> u64 {
        self.index
    }
}
