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

//! Exclusive ownership of the live native surface.

use neko_core::error::BindingError;
use neko_core::surface::NativeSurface;

/// Sole owner of the host's surface handle while it is valid.
///
/// At most one handle is held at any inspection point. A replacement is
/// never installed before the previous handle has been dropped, so no stale
/// reference to the host-owned window object can survive a rebind or unbind
/// — both release synchronously, before the call returns.
#[derive(Debug, Default)]
pub struct SurfaceBinding {
    current: Option<Box<dyn NativeSurface>>,
}

impl SurfaceBinding {
    /// Creates an empty binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `surface` as the bound surface.
    ///
    /// Fails with [`BindingError::AlreadyBound`] if a handle is currently
    /// held; the caller must unbind first. Surface replacement goes through
    /// [`rebind`](Self::rebind).
    pub fn bind(&mut self, surface: Box<dyn NativeSurface>) -> Result<(), BindingError> {
        if let Some(held) = &self.current {
            return Err(BindingError::AlreadyBound {
                held: held.id(),
                offered: surface.id(),
            });
        }

        log::debug!(
            "Binding surface {} ({}x{})",
            surface.id(),
            surface.size().0,
            surface.size().1
        );
        self.current = Some(surface);
        Ok(())
    }

    /// Releases the held handle and installs its replacement.
    ///
    /// The old handle is dropped before the new one is installed. Also valid
    /// with nothing bound, in which case it behaves like a bind.
    pub fn rebind(&mut self, surface: Box<dyn NativeSurface>, width: u32, height: u32) {
        if let Some(old) = self.current.take() {
            log::debug!("Releasing surface {} for rebind", old.id());
        }
        log::debug!("Rebinding surface {} ({width}x{height})", surface.id());
        self.current = Some(surface);
    }

    /// Releases the held handle. Idempotent; safe with nothing bound.
    pub fn unbind(&mut self) {
        if let Some(old) = self.current.take() {
            log::debug!("Unbinding surface {}", old.id());
        }
    }

    /// Whether a surface is currently held.
    pub fn is_bound(&self) -> bool {
        self.current.is_some()
    }

    /// Borrow of the bound surface, if any.
    pub fn surface(&self) -> Option<&dyn NativeSurface> {
        self.current.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neko_core::surface::HeadlessSurface;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Stub surface counting its own drops, to prove handles are released
    /// synchronously during rebind/unbind.
    #[derive(Debug)]
    struct TrackedSurface {
        id: u64,
        drops: Arc<AtomicUsize>,
    }

    impl NativeSurface for TrackedSurface {
        fn id(&self) -> u64 {
            self.id
        }

        fn size(&self) -> (u32, u32) {
            (128, 128)
        }
    }

    impl Drop for TrackedSurface {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn tracked(id: u64, drops: &Arc<AtomicUsize>) -> Box<dyn NativeSurface> {
        Box::new(TrackedSurface {
            id,
            drops: Arc::clone(drops),
        })
    }

    #[test]
    fn bind_installs_and_reports_the_surface() {
        let mut binding = SurfaceBinding::new();
        assert!(!binding.is_bound());

        binding.bind(HeadlessSurface::boxed(1, (320, 200))).unwrap();
        assert!(binding.is_bound());
        assert_eq!(binding.surface().unwrap().id(), 1);
    }

    #[test]
    fn double_bind_is_rejected_with_both_identities() {
        let mut binding = SurfaceBinding::new();
        binding.bind(HeadlessSurface::boxed(1, (320, 200))).unwrap();

        let err = binding
            .bind(HeadlessSurface::boxed(2, (320, 200)))
            .unwrap_err();
        assert_eq!(err, BindingError::AlreadyBound { held: 1, offered: 2 });

        // The original binding is untouched.
        assert_eq!(binding.surface().unwrap().id(), 1);
    }

    #[test]
    fn unbind_twice_equals_unbind_once() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut binding = SurfaceBinding::new();
        binding.bind(tracked(1, &drops)).unwrap();

        binding.unbind();
        assert!(!binding.is_bound());
        assert_eq!(drops.load(Ordering::SeqCst), 1);

        binding.unbind();
        assert!(!binding.is_bound());
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rebind_releases_the_old_handle_before_returning() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut binding = SurfaceBinding::new();
        binding.bind(tracked(1, &drops)).unwrap();

        binding.rebind(tracked(2, &drops), 640, 480);
        assert_eq!(
            drops.load(Ordering::SeqCst),
            1,
            "the old handle must be dropped synchronously"
        );
        assert_eq!(binding.surface().unwrap().id(), 2);
    }

    #[test]
    fn rebind_onto_an_empty_binding_acts_as_bind() {
        let mut binding = SurfaceBinding::new();
        binding.rebind(HeadlessSurface::boxed(5, (100, 100)), 100, 100);
        assert_eq!(binding.surface().unwrap().id(), 5);
    }
}
