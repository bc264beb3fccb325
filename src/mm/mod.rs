//! Memory management interface for the boundary layer
//!
//! Provides:
//! - Virtual address type and page constants
//! - Mapping flags and errors
//! - The per-process address-space trait
//! - Incremental heap growth (`sbrk`)

mod address;
mod brk;
mod paging;
mod space;

pub use address::{pages_covering, VirtAddr, PAGE_SIZE};
pub use brk::{GrowError, HeapBreak};
pub use paging::{MappingError, PageFlags};
pub use space::AddressSpace;
