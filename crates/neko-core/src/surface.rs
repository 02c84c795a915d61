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

//! Surface handle contracts at the windowing seam.
//!
//! The engine never allocates its own render target; the host owns the
//! native window and hands the engine an opaque handle to it. These traits
//! keep the bridge agnostic of the window system behind that handle.

use std::fmt;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

/// Combines the windowing handle traits a graphics backend needs from a
/// surface source. Exists to satisfy Rust's trait-object rules.
pub trait SurfaceSource: HasWindowHandle + HasDisplayHandle {}

impl<T: HasWindowHandle + HasDisplayHandle> SurfaceSource for T {}

/// An opaque, exclusively-owned native surface target.
///
/// Exactly one `Box<dyn NativeSurface>` exists per live surface: it moves
/// from the host callback into the event queue, and from there into the
/// surface binding. It is never cloned, and dropping it releases whatever
/// the host-side handle refers to.
pub trait NativeSurface: Send + fmt::Debug {
    /// Stable identifier of the underlying native window object.
    fn id(&self) -> u64;

    /// Physical dimensions (width, height) of the drawable area.
    fn size(&self) -> (u32, u32);
}

/// Owned adapter exposing any window-system handle as a [`NativeSurface`].
///
/// The concrete window type stays reachable through [`source`](Self::source)
/// for graphics backends that need the raw handles back.
pub struct WindowSurface<W: SurfaceSource + Send + 'static> {
    source: W,
    id: u64,
    size: (u32, u32),
}

impl<W: SurfaceSource + Send + 'static> WindowSurface<W> {
    /// Wraps `source` under the given identifier and initial size.
    pub fn new(source: W, id: u64, size: (u32, u32)) -> Self {
        Self { source, id, size }
    }

    /// The wrapped window-system handle.
    pub fn source(&self) -> &W {
        &self.source
    }
}

impl<W: SurfaceSource + Send + 'static> fmt::Debug for WindowSurface<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowSurface")
            .field("id", &self.id)
            .field("size", &self.size)
            .finish()
    }
}

impl<W: SurfaceSource + Send + 'static> NativeSurface for WindowSurface<W> {
    fn id(&self) -> u64 {
        self.id
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }
}

/// Surface stand-in with no window system behind it.
///
/// Used by tests and headless hosts that drive the lifecycle without a real
/// compositor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessSurface {
    id: u64,
    size: (u32, u32),
}

impl HeadlessSurface {
    /// Creates a stand-in surface with the given identifier and size.
    pub fn new(id: u64, size: (u32, u32)) -> Self {
        Self { id, size }
    }

    /// Convenience for the common boxed form events carry.
    pub fn boxed(id: u64, size: (u32, u32)) -> Box<dyn NativeSurface> {
        Box::new(Self::new(id, size))
    }
}

impl NativeSurface for HeadlessSurface {
    fn id(&self) -> u64 {
        self.id
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw_window_handle::{DisplayHandle, HandleError, WindowHandle};

    /// A window-system source that never yields raw handles; enough to prove
    /// the adapter compiles against the trait seam.
    struct DetachedSource;

    impl HasWindowHandle for DetachedSource {
        fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
            Err(HandleError::Unavailable)
        }
    }

    impl HasDisplayHandle for DetachedSource {
        fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
            Err(HandleError::Unavailable)
        }
    }

    #[test]
    fn window_surface_reports_identity_and_size() {
        let surface = WindowSurface::new(DetachedSource, 7, (1920, 1080));
        assert_eq!(surface.id(), 7);
        assert_eq!(surface.size(), (1920, 1080));
        assert!(surface.source().window_handle().is_err());
    }

    #[test]
    fn headless_surface_boxes_into_trait_object() {
        let surface = HeadlessSurface::boxed(3, (640, 480));
        assert_eq!(surface.id(), 3);
        assert_eq!(surface.size(), (640, 480));
    }
}
