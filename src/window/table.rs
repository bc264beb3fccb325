//! Per-Process Window Table
//!
//! A fixed-size array of window references, addressed by index.
//!
//! # Design
//! - At most [`MAX_WINDOWS`] entries, filled densely from index 0
//! - An index is handed to user space and names the same window until the
//!   process exits
//! - Cloning the table clones every reference, which is how a spawned
//!   process inherits its parent's windows

use crate::config::MAX_WINDOWS;

use super::surface::WindowRef;

/// Error type for window table operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowTableError {
    /// All slots are occupied.
    Full,
}

impl core::fmt::Display for WindowTableError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Full => write!(f, "window table full"),
        }
    }
}

/// The windows a process holds.
#[derive(Debug, Clone)]
pub struct WindowTable {
    slots: [Option<WindowRef>; MAX_WINDOWS],
    count: usize,
}

impl WindowTable {
    /// Create a new empty table.
    pub const fn new() -> Self {
        const EMPTY: Option<WindowRef> = None;
        Self {
            slots: [EMPTY; MAX_WINDOWS],
            count: 0,
        }
    }

    /// Number of open windows.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count >= MAX_WINDOWS
    }

    /// Look up an open window by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&WindowRef> {
        if index < self.count {
            self.slots[index].as_ref()
        } else {
            None
        }
    }

    /// Append a window and return its index.
    pub fn push(&mut self, window: WindowRef) -> Result<usize, WindowTableError> {
        if self.is_full() {
            return Err(WindowTableError::Full);
        }
        let index = self.count;
        self.slots[index] = Some(window);
        self.count += 1;
        Ok(index)
    }

    /// Duplicate the whole table for a new process.
    ///
    /// Every window is shared, not copied: each surface gains one holder.
    #[inline]
    pub fn inherit(&self) -> Self {
        self.clone()
    }

    /// Drop every reference this table holds.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.count = 0;
    }

    /// Iterate over open windows in index order.
    pub fn iter(&self) -> impl Iterator<Item = &WindowRef> {
        self.slots[..self.count].iter().flatten()
    }
}

impl Default for WindowTable {
    fn default() -> Self {
        Self::new()
    }
}
