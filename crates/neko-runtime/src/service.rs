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

//! The engine service: owns the engine thread and everything on it.
//!
//! All engine state (lifecycle machine, surface binding, frame driver) lives
//! on the dedicated engine thread; the service handle only carries the queue
//! and the outward channels. Host threads communicate exclusively through
//! the event queue.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use neko_core::config::EngineConfig;
use neko_core::event::{BridgeSignal, LifecycleEvent, SignalBus};
use neko_core::frame::FrameTick;
use neko_core::lifecycle::{Action, EngineState, LifecycleMachine, Transition};

use crate::binding::SurfaceBinding;
use crate::driver::{EngineApp, FrameDriver};
use crate::queue::EventQueue;
use crate::stats::{stats_channel, FrameStats, StatsFeed};

/// Handle to the running engine thread.
///
/// Created by [`EngineService::spawn`]. Events go in through
/// [`push`](Self::push); observation happens through the signal receiver and
/// the lossy stats feed. Dropping the handle shuts the engine down.
pub struct EngineService {
    queue: Arc<EventQueue>,
    terminated: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
    signals: flume::Receiver<BridgeSignal>,
    stats: crossbeam_channel::Receiver<FrameTick>,
}

impl EngineService {
    /// Spawns the engine thread and returns immediately.
    ///
    /// The caller (typically the library-loading thread) is never blocked;
    /// the engine sits in `Uninitialized` until the host delivers its first
    /// surface.
    pub fn spawn(config: EngineConfig, app: Box<dyn EngineApp>) -> Self {
        let queue = Arc::new(EventQueue::new(config.queue_capacity));
        let bus = SignalBus::new();
        let signals = bus.subscribe();
        let (feed, stats) = stats_channel(config.stats_buffer_size);
        let terminated = Arc::new(AtomicBool::new(false));

        let thread_queue = Arc::clone(&queue);
        let thread_terminated = Arc::clone(&terminated);
        let handle = thread::spawn(move || {
            engine_loop(config, &thread_queue, &bus, feed, app);
            thread_terminated.store(true, Ordering::SeqCst);
        });

        Self {
            queue,
            terminated,
            handle: Some(handle),
            signals,
            stats,
        }
    }

    /// Pushes a host event onto the queue.
    ///
    /// Overflow recovery is logged here and never surfaced further: the
    /// queue's policy already decided which event gave way.
    pub fn push(&self, event: LifecycleEvent) {
        log::trace!("Host event: {}", event.name());
        if let Err(overflow) = self.queue.push(event) {
            log::warn!("{overflow}");
        }
    }

    /// Shared handle to the event queue, for the host boundary.
    pub fn queue(&self) -> Arc<EventQueue> {
        Arc::clone(&self.queue)
    }

    /// Receiver for lifecycle signals leaving the engine thread.
    pub fn signals(&self) -> &flume::Receiver<BridgeSignal> {
        &self.signals
    }

    /// Receiver for the lossy frame-tick feed.
    pub fn stats(&self) -> &crossbeam_channel::Receiver<FrameTick> {
        &self.stats
    }

    /// Whether the engine thread has reached `Terminated` and exited.
    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    /// Requests teardown and joins the engine thread. Idempotent.
    pub fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        log::info!("Shutting down engine service...");
        if let Err(overflow) = self.queue.push(LifecycleEvent::DestroyRequested) {
            // The teardown event itself is never the entry dropped.
            log::warn!("{overflow}");
        }
        if handle.join().is_err() {
            log::error!("Engine thread panicked before termination.");
        }
        // Terminal either way: a panicking drain still counts as terminated,
        // with resources released best-effort by unwinding.
        self.terminated.store(true, Ordering::SeqCst);
    }
}

impl Drop for EngineService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The engine thread body. Returns once the lifecycle reaches `Terminated`.
fn engine_loop(
    config: EngineConfig,
    queue: &EventQueue,
    bus: &SignalBus<BridgeSignal>,
    mut feed: StatsFeed,
    mut app: Box<dyn EngineApp>,
) {
    let mut machine = LifecycleMachine::new();
    let mut binding = SurfaceBinding::new();
    let mut driver = FrameDriver::new(Duration::from_millis(config.max_frame_delta_ms));
    let mut stats = FrameStats::new(Duration::from_secs(config.summary_period_secs));

    let frame_budget = Duration::from_secs_f64(1.0 / f64::from(config.tick_rate.max(1)));
    let idle_poll = Duration::from_millis(config.idle_poll_ms.max(1));

    log::info!("Engine thread started ({} Hz target).", config.tick_rate);

    loop {
        // Apply everything already queued before committing to a frame.
        while let Some(event) = queue.try_pop() {
            process_event(event, &mut machine, &mut binding, &mut driver, &mut *app, bus);
        }

        if machine.state() == EngineState::Terminating {
            // The queue was empty a moment ago: the drain is complete.
            let transition = machine.complete_drain();
            if !transition.is_noop() {
                binding.unbind();
                driver.suspend(&mut *app);
                bus.publish(BridgeSignal::StateChanged {
                    from: transition.from,
                    to: transition.to,
                });
            }
            bus.publish(BridgeSignal::Terminated);
            break;
        }

        if driver.is_scheduled() && machine.state() == EngineState::Running {
            let frame_started = Instant::now();
            match driver.tick(&mut *app, binding.surface()) {
                Ok(tick) => {
                    feed.publish(tick);
                    stats.record(&tick);
                }
                Err(error) => log::error!("{error}"),
            }

            // Sleep out the rest of the frame budget, waking early for
            // arriving events.
            let elapsed = frame_started.elapsed();
            if elapsed < frame_budget {
                if let Ok(event) = queue.pop_timeout(frame_budget - elapsed) {
                    process_event(event, &mut machine, &mut binding, &mut driver, &mut *app, bus);
                }
            }
        } else {
            // Suspended: nothing to do until an event arrives.
            if let Ok(event) = queue.pop_timeout(idle_poll) {
                process_event(event, &mut machine, &mut binding, &mut driver, &mut *app, bus);
            }
        }
    }

    log::info!(
        "Engine terminated after {} frames.",
        stats.total_frames()
    );
}

/// Applies one event to the machine and performs the resulting actions in
/// order.
fn process_event(
    event: LifecycleEvent,
    machine: &mut LifecycleMachine,
    binding: &mut SurfaceBinding,
    driver: &mut FrameDriver,
    app: &mut dyn EngineApp,
    bus: &SignalBus<BridgeSignal>,
) {
    let transition = machine.apply(&event);

    // Take the surface payload out of the event before the actions consume
    // it. A payload left unclaimed by a no-op transition simply drops here,
    // releasing the handle.
    let mut payload = match event {
        LifecycleEvent::SurfaceCreated(surface) => Some((surface, None)),
        LifecycleEvent::SurfaceChanged {
            surface,
            width,
            height,
        } => Some((surface, Some((width, height)))),
        _ => None,
    };

    perform_actions(&transition, &mut payload, binding, driver, app);

    if transition.from != transition.to {
        bus.publish(BridgeSignal::StateChanged {
            from: transition.from,
            to: transition.to,
        });
    }
}

type SurfacePayload = (
    Box<dyn neko_core::surface::NativeSurface>,
    Option<(u32, u32)>,
);

fn perform_actions(
    transition: &Transition,
    payload: &mut Option<SurfacePayload>,
    binding: &mut SurfaceBinding,
    driver: &mut FrameDriver,
    app: &mut dyn EngineApp,
) {
    for action in &transition.actions {
        match action {
            Action::BindSurface => {
                if let Some((surface, _)) = payload.take() {
                    if let Err(error) = binding.bind(surface) {
                        debug_assert!(false, "{error}");
                        log::error!("{error}");
                    }
                }
            }
            Action::RebindSurface => {
                if let Some((surface, dims)) = payload.take() {
                    let (width, height) = dims.unwrap_or_else(|| surface.size());
                    binding.rebind(surface, width, height);
                }
            }
            Action::UnbindSurface => binding.unbind(),
            Action::SuspendDriver => driver.suspend(app),
            Action::ResumeDriver => driver.resume(app),
            Action::ReleaseResources => {
                binding.unbind();
                driver.suspend(app);
            }
        }
    }
}
