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

//! Frame telemetry: a lossy observer feed and periodic logged summaries.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use neko_core::frame::FrameTick;

/// Creates the bounded observer feed for frame ticks.
///
/// The receiving half goes to whoever watches the engine from outside; the
/// sending half stays on the engine thread.
pub fn stats_channel(buffer_size: usize) -> (StatsFeed, Receiver<FrameTick>) {
    let (sender, receiver) = crossbeam_channel::bounded(buffer_size.max(1));
    (StatsFeed { sender, dropped: 0 }, receiver)
}

/// Sending half of the observer feed, owned by the engine thread.
///
/// Publishing never blocks a frame: when the buffer is full the tick is
/// dropped, the same lossy-buffer policy the engine applies to all telemetry.
#[derive(Debug)]
pub struct StatsFeed {
    sender: Sender<FrameTick>,
    dropped: u64,
}

impl StatsFeed {
    /// Publishes a tick copy without blocking.
    pub fn publish(&mut self, tick: FrameTick) {
        match self.sender.try_send(tick) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                log::trace!(
                    "Stats feed full; dropped tick {} ({} dropped so far)",
                    tick.index,
                    self.dropped
                );
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }

    /// Number of ticks dropped because the buffer was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Rolling frame statistics with a periodic logged summary.
#[derive(Debug)]
pub struct FrameStats {
    total_frames: u64,
    window_frames: u32,
    window_delta_sum: f32,
    window_delta_peak: f32,
    window_started: Instant,
    period: Duration,
}

impl FrameStats {
    /// Creates an accumulator logging a summary every `period`. A zero
    /// period disables the summary log.
    pub fn new(period: Duration) -> Self {
        Self {
            total_frames: 0,
            window_frames: 0,
            window_delta_sum: 0.0,
            window_delta_peak: 0.0,
            window_started: Instant::now(),
            period,
        }
    }

    /// Records a tick. Logs a summary and resets the window when the period
    /// has elapsed; returns whether a summary was logged.
    pub fn record(&mut self, tick: &FrameTick) -> bool {
        self.total_frames += 1;
        self.window_frames += 1;
        self.window_delta_sum += tick.delta_secs;
        self.window_delta_peak = self.window_delta_peak.max(tick.delta_secs);

        if self.period.is_zero() {
            return false;
        }

        let window_elapsed = self.window_started.elapsed();
        if window_elapsed < self.period || self.window_frames == 0 {
            return false;
        }

        let fps = self.window_frames as f64 / window_elapsed.as_secs_f64();
        let avg_ms = self.window_delta_sum / self.window_frames as f32 * 1000.0;
        log::info!(
            "Frame summary: {} frames, {:.1} fps, avg {:.2} ms, peak {:.2} ms",
            self.window_frames,
            fps,
            avg_ms,
            self.window_delta_peak * 1000.0
        );

        self.window_frames = 0;
        self.window_delta_sum = 0.0;
        self.window_delta_peak = 0.0;
        self.window_started = Instant::now();
        true
    }

    /// Frames recorded since creation.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn tick(index: u64, delta_secs: f32) -> FrameTick {
        FrameTick {
            index,
            elapsed_secs: index as f64 * delta_secs as f64,
            delta_secs,
        }
    }

    #[test]
    fn feed_drops_when_the_buffer_is_full() {
        let (mut feed, rx) = stats_channel(2);
        feed.publish(tick(1, 0.016));
        feed.publish(tick(2, 0.016));
        feed.publish(tick(3, 0.016));

        assert_eq!(feed.dropped(), 1);
        assert_eq!(rx.try_recv().unwrap().index, 1);
        assert_eq!(rx.try_recv().unwrap().index, 2);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn feed_tolerates_a_dropped_receiver() {
        let (mut feed, rx) = stats_channel(2);
        drop(rx);
        feed.publish(tick(1, 0.016));
        assert_eq!(feed.dropped(), 0, "disconnect is not counted as overflow");
    }

    #[test]
    fn zero_period_never_logs_a_summary() {
        let mut stats = FrameStats::new(Duration::ZERO);
        for index in 1..=100 {
            assert!(!stats.record(&tick(index, 0.016)));
        }
        assert_eq!(stats.total_frames(), 100);
    }

    #[test]
    fn summary_fires_once_the_period_elapses() {
        let mut stats = FrameStats::new(Duration::from_millis(20));
        assert!(!stats.record(&tick(1, 0.016)));

        thread::sleep(Duration::from_millis(30));
        assert!(stats.record(&tick(2, 0.016)));

        // Window reset: the next record starts a fresh period.
        assert!(!stats.record(&tick(3, 0.016)));
        assert_eq!(stats.total_frames(), 3);
    }
}
