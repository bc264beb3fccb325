//! Kernel boundary configuration
//!
//! Compile-time limits plus the runtime [`KernelConfig`] a kernel hands to
//! [`crate::Kernel::new`].

use crate::mm::VirtAddr;

/// Maximum number of window references a process can hold.
pub const MAX_WINDOWS: usize = 5;

/// Maximum number of arguments accepted by `process_run`.
pub const MAX_ARGS: usize = 32;

/// Maximum length of a single argument, excluding the terminator.
pub const MAX_ARG_LEN: usize = 256;

/// Maximum length of an executable path, excluding the terminator.
pub const MAX_PATH_LEN: usize = 256;

/// Maximum number of graphics commands accepted by one `draw_write`.
pub const MAX_GRAPHICS_COMMANDS: usize = 1024;

/// The range of addresses user pointers may point into.
///
/// Every pointer argument is checked against this region before the kernel
/// reads or writes through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRegion {
    /// First valid user address.
    pub start: usize,
    /// One past the last valid user address.
    pub end: usize,
}

impl UserRegion {
    /// Lower half of the 48-bit address space, minus the null guard.
    pub const DEFAULT: Self = Self::new(0x0000_0000_0040_0000, 0x0000_8000_0000_0000);

    /// Create a region covering `[start, end)`.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Check that `[addr, addr + len)` lies entirely inside the region.
    pub fn contains_range(&self, addr: usize, len: usize) -> bool {
        if addr < self.start {
            return false;
        }
        match addr.checked_add(len) {
            Some(end) => end <= self.end,
            None => false,
        }
    }
}

/// Runtime configuration for the boundary layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelConfig {
    /// Where user pointers may point.
    pub user_region: UserRegion,
    /// Highest address the break pointer may reach.
    ///
    /// Results travel back as `i32`, so this never exceeds `i32::MAX`.
    pub user_heap_limit: VirtAddr,
}

impl KernelConfig {
    pub const DEFAULT: Self = Self {
        user_region: UserRegion::DEFAULT,
        user_heap_limit: VirtAddr::new(0x7000_0000),
    };

    /// Replace the user region.
    pub const fn with_user_region(mut self, region: UserRegion) -> Self {
        self.user_region = region;
        self
    }

    /// Replace the heap limit, clamped to what a 32-bit result can carry.
    pub const fn with_heap_limit(mut self, limit: usize) -> Self {
        let limit = if limit > i32::MAX as usize { i32::MAX as usize } else { limit };
        self.user_heap_limit = VirtAddr::new(limit);
        self
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
