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

//! The lifecycle state machine.
//!
//! The transition function itself is pure: it computes the next state and the
//! side effects the engine thread must perform, and commits nothing. The
//! [`LifecycleMachine`] wrapper owns the single authoritative state copy and
//! is only ever touched from the engine thread.

use crate::event::LifecycleEvent;

/// Engine lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineState {
    /// Process attached, no surface seen yet.
    #[default]
    Uninitialized,
    /// Frame loop active against a bound surface.
    Running,
    /// Host paused the application or focus was lost; frame loop suspended.
    Paused,
    /// The surface went away while the engine would otherwise run.
    SurfaceLost,
    /// Teardown requested; draining remaining work.
    Terminating,
    /// Final state. No further events are processed.
    Terminated,
}

impl EngineState {
    /// Whether the state machine still accepts events in this state.
    pub fn is_live(&self) -> bool {
        !matches!(self, Self::Terminating | Self::Terminated)
    }
}

/// A side effect the engine thread must perform to honor a transition.
///
/// Ordering within a transition's action list is significant: a suspend
/// always precedes the unbind it protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Install the surface carried by the event as the bound surface.
    BindSurface,
    /// Release the bound surface and install the event's replacement.
    RebindSurface,
    /// Release the bound surface.
    UnbindSurface,
    /// Halt frame scheduling after the in-flight frame completes.
    SuspendDriver,
    /// Restart frame scheduling from the next tick boundary.
    ResumeDriver,
    /// Final teardown once the Terminating drain completes.
    ReleaseResources,
}

/// The outcome of applying one event to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State before the event.
    pub from: EngineState,
    /// State after the event.
    pub to: EngineState,
    /// Side effects to perform, in order.
    pub actions: Vec<Action>,
}

impl Transition {
    fn stay(state: EngineState) -> Self {
        Self {
            from: state,
            to: state,
            actions: Vec::new(),
        }
    }

    fn advance(from: EngineState, to: EngineState, actions: Vec<Action>) -> Self {
        Self { from, to, actions }
    }

    /// Whether the event changed neither state nor required any action.
    pub fn is_noop(&self) -> bool {
        self.from == self.to && self.actions.is_empty()
    }
}

/// Computes the transition for `event` arriving in `state`.
///
/// Total over every (state, event) pair: unlisted pairs return a no-op
/// transition back to the same state. `surface_bound` feeds the conditional
/// resume-from-pause row, which lands in [`EngineState::SurfaceLost`] when
/// the surface disappeared while paused.
pub fn transition(
    state: EngineState,
    surface_bound: bool,
    event: &LifecycleEvent,
) -> Transition {
    use Action::*;
    use EngineState::*;
    use LifecycleEvent as Ev;

    // Teardown preempts everything while the machine is live. After that,
    // repeats are no-ops like any other late event.
    if matches!(event, Ev::DestroyRequested) && state.is_live() {
        return Transition::advance(state, Terminating, vec![SuspendDriver, UnbindSurface]);
    }

    match (state, event) {
        (Uninitialized, Ev::SurfaceCreated(_)) => {
            Transition::advance(state, Running, vec![BindSurface, ResumeDriver])
        }
        (Running, Ev::SurfaceChanged { .. }) => {
            Transition::advance(state, Running, vec![RebindSurface])
        }
        (Running, Ev::SurfaceDestroyed) => {
            Transition::advance(state, SurfaceLost, vec![SuspendDriver, UnbindSurface])
        }
        (Running, Ev::Pause | Ev::FocusLost) => {
            Transition::advance(state, Paused, vec![SuspendDriver])
        }
        (Paused, Ev::Resume | Ev::FocusGained) => {
            if surface_bound {
                Transition::advance(state, Running, vec![ResumeDriver])
            } else {
                // The surface died while we were paused; wait for a new one.
                Transition::advance(state, SurfaceLost, Vec::new())
            }
        }
        (Paused, Ev::SurfaceDestroyed) => {
            // Driver is already suspended; only the handle goes.
            Transition::advance(state, SurfaceLost, vec![UnbindSurface])
        }
        (SurfaceLost, Ev::SurfaceCreated(_)) => {
            Transition::advance(state, Running, vec![BindSurface, ResumeDriver])
        }
        _ => Transition::stay(state),
    }
}

/// Owns the single authoritative [`EngineState`] copy.
///
/// Mutated only by the engine thread; everything else observes state changes
/// through published signals.
#[derive(Debug, Default)]
pub struct LifecycleMachine {
    state: EngineState,
    surface_bound: bool,
}

impl LifecycleMachine {
    /// Creates a machine in [`EngineState::Uninitialized`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Whether the machine believes a surface is currently bound.
    pub fn surface_bound(&self) -> bool {
        self.surface_bound
    }

    /// Applies `event`, commits the resulting state, and updates the surface
    /// bookkeeping from the returned actions.
    pub fn apply(&mut self, event: &LifecycleEvent) -> Transition {
        let transition = transition(self.state, self.surface_bound, event);

        if transition.is_noop() {
            log::debug!(
                "Ignoring {} in state {:?}",
                event.name(),
                self.state
            );
            return transition;
        }

        log::debug!(
            "{}: {:?} -> {:?} ({:?})",
            event.name(),
            transition.from,
            transition.to,
            transition.actions
        );

        self.state = transition.to;
        for action in &transition.actions {
            match action {
                Action::BindSurface | Action::RebindSurface => self.surface_bound = true,
                Action::UnbindSurface | Action::ReleaseResources => self.surface_bound = false,
                Action::SuspendDriver | Action::ResumeDriver => {}
            }
        }

        transition
    }

    /// Completes the Terminating drain, entering the final state.
    ///
    /// A no-op transition in any state other than
    /// [`EngineState::Terminating`].
    pub fn complete_drain(&mut self) -> Transition {
        if self.state != EngineState::Terminating {
            return Transition::stay(self.state);
        }

        let transition = Transition::advance(
            EngineState::Terminating,
            EngineState::Terminated,
            vec![Action::ReleaseResources],
        );
        self.state = EngineState::Terminated;
        self.surface_bound = false;
        log::info!("Lifecycle drain complete; engine terminated.");
        transition
    }
}
