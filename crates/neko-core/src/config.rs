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

//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the engine service.
///
/// Hosts may deserialize this from their own configuration source; every
/// field has a conservative default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Target frequency of the frame loop in Hz.
    pub tick_rate: u32,
    /// Maximum number of lifecycle events the queue holds. Beyond it, the
    /// drop-oldest-non-critical overflow policy applies.
    pub queue_capacity: usize,
    /// Maximum number of frame ticks the stats feed buffers.
    /// If the buffer is full, new ticks are dropped.
    pub stats_buffer_size: usize,
    /// Upper clamp on a single frame delta, in milliseconds.
    pub max_frame_delta_ms: u64,
    /// Poll interval for the event queue while the driver is suspended, in
    /// milliseconds.
    pub idle_poll_ms: u64,
    /// Period between logged frame summaries, in seconds. Zero disables the
    /// summary log.
    pub summary_period_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            queue_capacity: 64,
            stats_buffer_size: 256,
            max_frame_delta_ms: 250,
            idle_poll_ms: 100,
            summary_period_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = EngineConfig::default();
        assert!(config.tick_rate > 0);
        assert!(config.queue_capacity > 0);
        assert!(config.stats_buffer_size > 0);
        assert!(config.max_frame_delta_ms > 0);
    }

    #[test]
    fn partial_deserialization_falls_back_to_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "tick_rate": 30 }"#).expect("valid config");
        assert_eq!(config.tick_rate, 30);
        assert_eq!(config.queue_capacity, EngineConfig::default().queue_capacity);
    }
}
