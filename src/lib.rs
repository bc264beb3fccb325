//! PantherOS Gate - the kernel/user boundary layer
//!
//! Everything a user-mode program touches when it crosses into the kernel,
//! and the user-space half that prepares those crossings.
//!
//! # Kernel side
//! - Trap entry: decodes the saved registers of an `svc` into a call
//! - Dispatcher: typed decoding of raw arguments, one handler per call
//! - Process lifecycle: spawn with window inheritance, exit, kill, wait, reap
//! - Heap growth: demand-paged `sbrk`
//! - Window drawing: clipped child surfaces and command submission
//!
//! # User side
//! - `SyscallGate` and typed syscall wrappers
//! - `OutputBuffer`: page-sized staging for debug output
//! - `UserHeap`: a global allocator that grows through `sbrk`
//!
//! # External collaborators
//! The scheduler, page tables, image loader, compositor, RTC, keyboard and
//! console are consumed through the traits in [`services`] and
//! [`mm::AddressSpace`]; their internals live elsewhere in the kernel.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

pub mod config;
pub mod kernel;
pub mod logging;
pub mod mm;
pub mod process;
pub mod services;
pub mod syscall;
pub mod time;
pub mod trap;
pub mod user;
pub mod window;

#[cfg(test)]
mod testing;

pub use config::KernelConfig;
pub use kernel::Kernel;
pub use services::Services;
pub use syscall::{SysResult, SyscallError, UNKNOWN_CALL};
