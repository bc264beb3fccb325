//! User-Space Runtime
//!
//! The half of the boundary that runs in user mode: issuing system calls,
//! buffering console output and growing the heap.

pub mod gate;
mod heap;
mod stdio;

#[cfg(all(target_arch = "aarch64", target_os = "none"))]
pub use gate::Svc;
pub use gate::SyscallGate;
pub use heap::{BreakSource, Sbrk, UserHeap, MIN_GROWTH};
pub use stdio::{OutputBuffer, CAPACITY};
