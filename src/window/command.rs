//! Graphics Commands
//!
//! `draw_write` takes a pointer to an array of these, terminated by a
//! command whose kind is [`GraphicsCommand::END`]. The compositor interprets
//! everything else.

/// One drawing instruction as laid out in user memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct GraphicsCommand {
    pub kind: u32,
    pub args: [i32; 4],
}

impl GraphicsCommand {
    /// Terminates a command list.
    pub const END: u32 = 0;

    pub const fn new(kind: u32, args: [i32; 4]) -> Self {
        Self { kind, args }
    }

    pub const fn end() -> Self {
        Self { kind: Self::END, args: [0; 4] }
    }

    #[inline]
    pub const fn is_end(&self) -> bool {
        self.kind == Self::END
    }
}
