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

//! The frame driver: the suspend/resume gate around the tick loop.

use std::time::Duration;

use neko_core::error::DriverError;
use neko_core::frame::{FrameClock, FrameTick};
use neko_core::surface::NativeSurface;

/// Per-frame hooks supplied by the embedding application.
///
/// All hooks run on the engine thread. `update` is the simulation step;
/// `render` then draws against the bound surface.
pub trait EngineApp: Send {
    /// Simulation step for this tick.
    fn update(&mut self, tick: &FrameTick);

    /// Render step for this tick, against the currently bound surface.
    fn render(&mut self, tick: &FrameTick, surface: &dyn NativeSurface);

    /// Called when the driver suspends (pause, surface loss, teardown).
    fn suspended(&mut self) {}

    /// Called when the driver resumes after a suspension.
    fn resumed(&mut self) {}
}

/// Drives one simulation+render iteration per tick while scheduled.
///
/// Ticks run on the engine thread itself, which is what makes the drain
/// guarantee cheap: by the time `suspend` returns, the in-flight frame (if
/// any) has completed and no further frame can start.
#[derive(Debug)]
pub struct FrameDriver {
    clock: FrameClock,
    scheduled: bool,
}

impl FrameDriver {
    /// Creates a suspended driver whose frame deltas are clamped to
    /// `max_delta`.
    pub fn new(max_delta: Duration) -> Self {
        Self {
            clock: FrameClock::new(max_delta),
            scheduled: false,
        }
    }

    /// Whether ticks are currently scheduled.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Completes the in-flight frame, then halts further scheduling.
    ///
    /// Idempotent; suspending a suspended driver does nothing.
    pub fn suspend(&mut self, app: &mut dyn EngineApp) {
        if !self.scheduled {
            return;
        }
        self.scheduled = false;
        app.suspended();
        log::debug!("Frame driver suspended at frame {}", self.clock.index());
    }

    /// Restarts scheduling from the next tick boundary.
    ///
    /// The frame clock restarts so the suspension gap never surfaces as one
    /// giant delta. Idempotent.
    pub fn resume(&mut self, app: &mut dyn EngineApp) {
        if self.scheduled {
            return;
        }
        self.clock.restart();
        self.scheduled = true;
        app.resumed();
        log::debug!("Frame driver resumed at frame {}", self.clock.index());
    }

    /// Runs one tick: the simulation step, then the render step against
    /// `surface`.
    ///
    /// Fails with [`DriverError::NoSurfaceBound`] when `surface` is absent —
    /// unreachable while the engine loop honors the lifecycle invariant, so
    /// it asserts in debug builds and is logged and skipped in release
    /// builds.
    pub fn tick(
        &mut self,
        app: &mut dyn EngineApp,
        surface: Option<&dyn NativeSurface>,
    ) -> Result<FrameTick, DriverError> {
        let surface = match surface {
            Some(surface) => surface,
            None => {
                debug_assert!(false, "frame tick attempted with no surface bound");
                log::error!("{}; skipping frame", DriverError::NoSurfaceBound);
                return Err(DriverError::NoSurfaceBound);
            }
        };

        let tick = self.clock.tick();
        app.update(&tick);
        app.render(&tick, surface);
        Ok(tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neko_core::surface::HeadlessSurface;

    #[derive(Default)]
    struct CountingApp {
        updates: u32,
        renders: u32,
        suspends: u32,
        resumes: u32,
        last_surface: Option<u64>,
    }

    impl EngineApp for CountingApp {
        fn update(&mut self, _tick: &FrameTick) {
            self.updates += 1;
        }

        fn render(&mut self, _tick: &FrameTick, surface: &dyn NativeSurface) {
            self.renders += 1;
            self.last_surface = Some(surface.id());
        }

        fn suspended(&mut self) {
            self.suspends += 1;
        }

        fn resumed(&mut self) {
            self.resumes += 1;
        }
    }

    #[test]
    fn ticks_run_update_then_render_against_the_surface() {
        let mut driver = FrameDriver::new(Duration::from_millis(250));
        let mut app = CountingApp::default();
        let surface = HeadlessSurface::new(11, (64, 64));

        driver.resume(&mut app);
        let first = driver.tick(&mut app, Some(&surface)).unwrap();
        let second = driver.tick(&mut app, Some(&surface)).unwrap();

        assert_eq!(first.index, 1);
        assert_eq!(second.index, 2);
        assert_eq!(app.updates, 2);
        assert_eq!(app.renders, 2);
        assert_eq!(app.last_surface, Some(11));
    }

    #[test]
    fn suspend_and_resume_are_idempotent_and_notify_once() {
        let mut driver = FrameDriver::new(Duration::from_millis(250));
        let mut app = CountingApp::default();

        driver.suspend(&mut app);
        assert_eq!(app.suspends, 0, "suspending a suspended driver is silent");

        driver.resume(&mut app);
        driver.resume(&mut app);
        assert_eq!(app.resumes, 1);
        assert!(driver.is_scheduled());

        driver.suspend(&mut app);
        driver.suspend(&mut app);
        assert_eq!(app.suspends, 1);
        assert!(!driver.is_scheduled());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "no surface bound")]
    fn tick_without_surface_asserts_in_debug_builds() {
        let mut driver = FrameDriver::new(Duration::from_millis(250));
        let mut app = CountingApp::default();
        driver.resume(&mut app);
        let _ = driver.tick(&mut app, None);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn tick_without_surface_is_skipped_in_release_builds() {
        let mut driver = FrameDriver::new(Duration::from_millis(250));
        let mut app = CountingApp::default();
        driver.resume(&mut app);

        assert_eq!(
            driver.tick(&mut app, None),
            Err(DriverError::NoSurfaceBound)
        );
        assert_eq!(app.renders, 0);
    }
}
