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

//! # Neko Bridge
//!
//! Host boundary of the engine. The platform shell (an activity, a window
//! shell, a test harness) calls [`initialize`] exactly once when the native
//! library is loaded, then forwards each of its lifecycle callbacks to the
//! matching [`HostBridge`] method. The bridge never inherits from or wraps
//! host types; it only translates callbacks into queued events.

#![warn(missing_docs)]

use std::sync::{Arc, Mutex, OnceLock};

use neko_core::config::EngineConfig;
use neko_core::event::{BridgeSignal, LifecycleEvent};
use neko_core::frame::FrameTick;
use neko_core::surface::NativeSurface;
use neko_runtime::driver::EngineApp;
use neko_runtime::queue::EventQueue;
use neko_runtime::service::EngineService;

static BRIDGE: OnceLock<HostBridge> = OnceLock::new();

/// One-time process attach.
///
/// Installs the logging panic hook, spawns the engine thread, and returns
/// the process-wide bridge without blocking the loading thread. A second
/// call is a logged no-op returning the existing bridge; the new `config`
/// and `app` are discarded.
pub fn initialize(config: EngineConfig, app: Box<dyn EngineApp>) -> &'static HostBridge {
    let mut first_attach = false;
    let bridge = BRIDGE.get_or_init(|| {
        first_attach = true;
        set_panic_hook();
        log::info!("Attaching engine ({} Hz target)...", config.tick_rate);
        HostBridge::new(config, app)
    });

    if !first_attach {
        log::warn!("Engine already attached; ignoring re-initialization.");
    }
    bridge
}

/// The process-wide bridge, if [`initialize`] has run.
pub fn bridge() -> Option<&'static HostBridge> {
    BRIDGE.get()
}

/// The host-facing callback surface.
///
/// One method per host lifecycle callback, each translating 1:1 into a
/// queued [`LifecycleEvent`]. All methods are safe to call from the host
/// callback thread; none of them blocks on the engine.
pub struct HostBridge {
    queue: Arc<EventQueue>,
    signals: flume::Receiver<BridgeSignal>,
    stats: crossbeam_channel::Receiver<FrameTick>,
    service: Mutex<EngineService>,
}

impl HostBridge {
    /// Builds a bridge around a freshly spawned engine service.
    ///
    /// [`initialize`] wraps this in the process-wide singleton; embedding
    /// hosts and tests may also hold a bridge directly.
    pub fn new(config: EngineConfig, app: Box<dyn EngineApp>) -> Self {
        let service = EngineService::spawn(config, app);
        Self {
            queue: service.queue(),
            signals: service.signals().clone(),
            stats: service.stats().clone(),
            service: Mutex::new(service),
        }
    }

    /// Queues an event; overflow recovery stays internal to the bridge.
    fn push(&self, event: LifecycleEvent) {
        log::trace!("Host callback: {}", event.name());
        if let Err(overflow) = self.queue.push(event) {
            log::warn!("{overflow}");
        }
    }

    /// The host created the native surface.
    pub fn on_surface_created(&self, surface: Box<dyn NativeSurface>) {
        self.push(LifecycleEvent::SurfaceCreated(surface));
    }

    /// The surface was recreated or resized.
    pub fn on_surface_changed(&self, surface: Box<dyn NativeSurface>, width: u32, height: u32) {
        self.push(LifecycleEvent::SurfaceChanged {
            surface,
            width,
            height,
        });
    }

    /// The surface is going away and must not be touched afterwards.
    pub fn on_surface_destroyed(&self) {
        self.push(LifecycleEvent::SurfaceDestroyed);
    }

    /// Window focus changed.
    pub fn on_focus_changed(&self, focused: bool) {
        self.push(if focused {
            LifecycleEvent::FocusGained
        } else {
            LifecycleEvent::FocusLost
        });
    }

    /// The host is moving the application to the background.
    pub fn on_pause(&self) {
        self.push(LifecycleEvent::Pause);
    }

    /// The host is bringing the application back to the foreground.
    pub fn on_resume(&self) {
        self.push(LifecycleEvent::Resume);
    }

    /// The host is tearing the process down.
    pub fn on_destroy(&self) {
        self.push(LifecycleEvent::DestroyRequested);
    }

    /// Owned receiver for lifecycle signals leaving the engine.
    pub fn subscribe(&self) -> flume::Receiver<BridgeSignal> {
        self.signals.clone()
    }

    /// Owned receiver for the lossy frame-tick feed.
    pub fn stats(&self) -> crossbeam_channel::Receiver<FrameTick> {
        self.stats.clone()
    }

    /// Whether the engine has reached its final state and exited.
    pub fn is_terminated(&self) -> bool {
        self.service.lock().unwrap().is_terminated()
    }

    /// Drives the engine to `Terminated` and joins its thread. Idempotent.
    pub fn shutdown(&self) {
        self.service.lock().unwrap().shutdown();
    }
}

/// Routes panic payloads through the logger before teardown.
fn set_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!(" in {} at {}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_default();

        if let Some(message) = info.payload().downcast_ref::<&str>() {
            log::error!("Caught panic{location}: {message}");
        } else if let Some(message) = info.payload().downcast_ref::<String>() {
            log::error!("Caught panic{location}: {message}");
        } else {
            log::error!("Caught panic{location}");
        }
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use neko_core::frame::FrameTick;
    use neko_core::lifecycle::EngineState;
    use neko_core::surface::HeadlessSurface;
    use std::time::Duration;

    struct NullApp;

    impl EngineApp for NullApp {
        fn update(&mut self, _tick: &FrameTick) {}
        fn render(&mut self, _tick: &FrameTick, _surface: &dyn NativeSurface) {}
    }

    fn test_config() -> EngineConfig {
        EngineConfig {
            tick_rate: 200,
            idle_poll_ms: 5,
            summary_period_secs: 0,
            ..EngineConfig::default()
        }
    }

    fn expect_state_change(
        signals: &flume::Receiver<BridgeSignal>,
        from: EngineState,
        to: EngineState,
    ) {
        assert_eq!(
            signals.recv_timeout(Duration::from_secs(2)),
            Ok(BridgeSignal::StateChanged { from, to })
        );
    }

    #[test]
    fn callbacks_drive_the_full_lifecycle() {
        let bridge = HostBridge::new(test_config(), Box::new(NullApp));
        let signals = bridge.subscribe();

        bridge.on_surface_created(HeadlessSurface::boxed(1, (800, 600)));
        expect_state_change(&signals, EngineState::Uninitialized, EngineState::Running);

        bridge.on_focus_changed(false);
        expect_state_change(&signals, EngineState::Running, EngineState::Paused);

        bridge.on_focus_changed(true);
        expect_state_change(&signals, EngineState::Paused, EngineState::Running);

        bridge.on_surface_destroyed();
        expect_state_change(&signals, EngineState::Running, EngineState::SurfaceLost);

        bridge.on_surface_created(HeadlessSurface::boxed(2, (800, 600)));
        expect_state_change(&signals, EngineState::SurfaceLost, EngineState::Running);

        bridge.on_destroy();
        expect_state_change(&signals, EngineState::Running, EngineState::Terminating);
        expect_state_change(&signals, EngineState::Terminating, EngineState::Terminated);
        assert_eq!(
            signals.recv_timeout(Duration::from_secs(2)),
            Ok(BridgeSignal::Terminated)
        );

        bridge.shutdown();
        assert!(bridge.is_terminated());
    }

    #[test]
    fn stats_flow_while_running() {
        let bridge = HostBridge::new(test_config(), Box::new(NullApp));
        let stats = bridge.stats();

        bridge.on_surface_created(HeadlessSurface::boxed(1, (320, 240)));
        let tick = stats
            .recv_timeout(Duration::from_secs(2))
            .expect("ticks should flow once running");
        assert!(tick.index >= 1);

        bridge.shutdown();
    }

    #[test]
    fn process_wide_initialize_is_one_shot() {
        let first = initialize(test_config(), Box::new(NullApp));
        let second = initialize(EngineConfig::default(), Box::new(NullApp));
        assert!(std::ptr::eq(first, second));

        first.on_surface_created(HeadlessSurface::boxed(1, (100, 100)));
        first.shutdown();
        assert!(first.is_terminated());
        assert!(bridge().is_some());
    }
}
