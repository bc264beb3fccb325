//! Shared Window Surfaces
//!
//! A surface is created by the compositor and may be held by several
//! processes at once: a parent and every child that inherited it.
//!
//! # Ownership
//! ```text
//!   parent.windows[0] ──┐
//!                       ├──► Arc<Surface> ──► compositor surface #id
//!   child.windows[0] ───┘
//! ```
//! Cloning a [`WindowRef`] takes a reference; dropping one releases it.
//! When the last holder lets go, the compositor is told to release the
//! surface.

use alloc::sync::Arc;
use core::fmt;

use super::rect::ClipRect;
use crate::services::Compositor;

/// Identifier the compositor assigns to a surface.
pub type SurfaceId = u32;

/// A compositor surface together with its clip rectangle.
pub struct Surface {
    id: SurfaceId,
    clip: ClipRect,
    compositor: Arc<dyn Compositor>,
}

impl Surface {
    /// Compositor identifier.
    #[inline]
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Region this surface may draw into.
    #[inline]
    pub fn clip(&self) -> ClipRect {
        self.clip
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        log::trace!("[WINDOW] releasing surface {}", self.id);
        self.compositor.release(self.id);
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("clip", &self.clip)
            .finish()
    }
}

/// A reference-counted handle to a [`Surface`].
#[derive(Clone, Debug)]
pub struct WindowRef(Arc<Surface>);

impl WindowRef {
    /// Wrap a surface the compositor has already created.
    ///
    /// Used for the root window handed to the first process.
    pub fn new(id: SurfaceId, clip: ClipRect, compositor: Arc<dyn Compositor>) -> Self {
        Self(Arc::new(Surface { id, clip, compositor }))
    }

    /// Ask the compositor for a child surface clipped to `clip`.
    ///
    /// `clip` must already be in screen coordinates.
    pub fn create_child(&self, clip: ClipRect) -> Option<Self> {
        let compositor = Arc::clone(&self.0.compositor);
        let id = compositor.create(&self.0)?;
        Some(Self::new(id, clip, compositor))
    }

    /// The underlying surface.
    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.0
    }

    /// Clip rectangle of the underlying surface.
    #[inline]
    pub fn clip(&self) -> ClipRect {
        self.0.clip
    }

    /// Number of holders currently sharing this surface.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// Whether two handles share one surface.
    #[inline]
    pub fn same_surface(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
