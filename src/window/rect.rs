//! Clip Rectangles
//!
//! A clip rectangle bounds where a surface may draw. Child rectangles are
//! requested relative to their parent's origin and stored in the parent's
//! coordinate space.

/// A rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct ClipRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl ClipRect {
    /// Create a rectangle.
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Carve a child rectangle out of this one.
    ///
    /// `(x, y)` is relative to this rectangle's origin. The child must lie
    /// entirely inside this rectangle; edges touching the far border are
    /// allowed. Returns the child translated by this rectangle's origin.
    pub fn sub_rect(&self, x: i32, y: i32, w: i32, h: i32) -> Option<Self> {
        if x < 0 || y < 0 || w < 0 || h < 0 {
            return None;
        }
        let right = x.checked_add(w)?;
        let bottom = y.checked_add(h)?;
        if right > self.w || bottom > self.h {
            return None;
        }
        Some(Self {
            x: self.x.checked_add(x)?,
            y: self.y.checked_add(y)?,
            w,
            h,
        })
    }
}
