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

// Neko sandbox
// Simulated host shell: drives the bridge through a realistic lifecycle
// without a real window system behind it.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use neko_core::config::EngineConfig;
use neko_core::frame::FrameTick;
use neko_core::surface::{HeadlessSurface, NativeSurface};
use neko_runtime::driver::EngineApp;

/// Toy simulation: integrates elapsed time and logs a heartbeat.
struct SandboxApp {
    simulated_secs: f64,
}

impl EngineApp for SandboxApp {
    fn update(&mut self, tick: &FrameTick) {
        self.simulated_secs += f64::from(tick.delta_secs);
    }

    fn render(&mut self, tick: &FrameTick, surface: &dyn NativeSurface) {
        if tick.index % 32 == 0 {
            log::info!(
                "frame {} on surface {} ({:.2}s simulated)",
                tick.index,
                surface.id(),
                self.simulated_secs
            );
        }
    }

    fn suspended(&mut self) {
        log::info!("simulation suspended at {:.2}s", self.simulated_secs);
    }

    fn resumed(&mut self) {
        log::info!("simulation resumed at {:.2}s", self.simulated_secs);
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = EngineConfig {
        tick_rate: 120,
        ..EngineConfig::default()
    };
    let bridge = neko_bridge::initialize(config, Box::new(SandboxApp { simulated_secs: 0.0 }));
    let stats = bridge.stats();

    // A plausible session, in the order a platform shell would deliver it.
    log::info!("host: surface created");
    bridge.on_surface_created(HeadlessSurface::boxed(1, (1280, 720)));
    bridge.on_focus_changed(true);
    thread::sleep(Duration::from_millis(500));

    log::info!("host: backgrounding");
    bridge.on_focus_changed(false);
    bridge.on_pause();
    thread::sleep(Duration::from_millis(300));

    log::info!("host: foregrounding with a recreated surface");
    bridge.on_resume();
    bridge.on_focus_changed(true);
    bridge.on_surface_changed(HeadlessSurface::boxed(2, (1920, 1080)), 1920, 1080);
    thread::sleep(Duration::from_millis(500));

    log::info!("host: destroying");
    bridge.on_surface_destroyed();
    bridge.on_destroy();
    bridge.shutdown();

    let ticks: Vec<FrameTick> = stats.try_iter().collect();
    if let (Some(first), Some(last)) = (ticks.first(), ticks.last()) {
        log::info!(
            "observed {} ticks on the stats feed (frames {}..={})",
            ticks.len(),
            first.index,
            last.index
        );
    }

    log::info!("terminated: {}", bridge.is_terminated());
    Ok(())
}
