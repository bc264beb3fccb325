//! System call numbers
//!
//! Shared by the kernel dispatcher and the user-space wrappers. Number 0 is
//! deliberately unassigned so a zeroed register never names a call.

pub const SYS_EXIT: usize = 1;
pub const SYS_DEBUG: usize = 2;
pub const SYS_YIELD: usize = 3;
pub const SYS_OPEN: usize = 4;
pub const SYS_READ: usize = 5;
pub const SYS_WRITE: usize = 6;
pub const SYS_LSEEK: usize = 7;
pub const SYS_CLOSE: usize = 8;
pub const SYS_SBRK: usize = 9;
pub const SYS_KEYBOARD_READ_CHAR: usize = 10;
pub const SYS_DRAW_CREATE: usize = 11;
pub const SYS_DRAW_WRITE: usize = 12;
pub const SYS_SLEEP: usize = 13;
pub const SYS_GETTIMEOFDAY: usize = 14;
pub const SYS_PROCESS_SELF: usize = 15;
pub const SYS_PROCESS_PARENT: usize = 16;
pub const SYS_PROCESS_RUN: usize = 17;
pub const SYS_PROCESS_KILL: usize = 18;
pub const SYS_PROCESS_WAIT: usize = 19;
pub const SYS_PROCESS_REAP: usize = 20;
