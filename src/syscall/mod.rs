//! System Call Interface
//!
//! The boundary between user processes and the kernel.
//!
//! # Security Model
//! - Whitelist approach: only numbers listed in [`numbers`] reach a handler
//! - Every pointer is validated against the user region and its target
//!   copied into kernel memory before a handler runs
//! - Invalid inputs return errors, never panic
//!
//! # Calls
//! | # | Call | Returns |
//! |---|------|---------|
//! | 1 | exit(status) | never observed |
//! | 2 | debug(text) | 0 |
//! | 3 | yield() | 0 |
//! | 4-8 | open, read, write, lseek, close | `NotImplemented` |
//! | 9 | sbrk(delta) | previous break |
//! | 10 | keyboard_read_char() | key code |
//! | 11 | draw_create(window, x, y, w, h) | window index |
//! | 12 | draw_write(commands) | compositor result |
//! | 13 | sleep(ms) | 0 |
//! | 14 | gettimeofday() | seconds since the epoch |
//! | 15 | process_self() | pid |
//! | 16 | process_parent() | parent pid |
//! | 17 | process_run(path, argv, argc) | child pid |
//! | 18 | process_kill(pid) | 0 |
//! | 19 | process_wait(info, timeout) | 0 |
//! | 20 | process_reap(pid) | 0 |

mod clock;
mod decode;
mod draw;
mod error;
mod handler;
mod io;
mod memory;
pub mod numbers;
mod process;
mod validate;

pub use decode::{DecodeError, Syscall};
pub use error::{encode, SysResult, SyscallError, UNKNOWN_CALL};
pub use validate::UserPtr;
