//! Window Surfaces
//!
//! Processes draw through windows: shared, reference-counted compositor
//! surfaces, each limited to a clip rectangle.
//!
//! # Sharing Rules
//! - A spawned process inherits every window of its parent
//! - Child windows are always contained in their parent window
//! - A surface is released when its last holder drops it

mod command;
mod rect;
mod surface;
mod table;

pub use command::GraphicsCommand;
pub use rect::ClipRect;
pub use surface::{Surface, SurfaceId, WindowRef};
pub use table::{WindowTable, WindowTableError};
