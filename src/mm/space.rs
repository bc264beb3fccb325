//! Address Space Interface
//!
//! The page-table primitives the boundary layer relies on. Each process owns
//! exactly one address space; the implementation (table walking, frame
//! allocation, TLB maintenance) belongs to the architecture layer.

use super::address::VirtAddr;
use super::paging::{MappingError, PageFlags};

/// Page-table operations on one process's address space.
///
/// # Contract
/// - `map` allocates fresh physical frames for every page in
///   `[addr, addr + size)` and maps them with `flags`
/// - `unmap` releases the frames again
/// - Both take page-aligned addresses and page-multiple sizes
pub trait AddressSpace: Send {
    /// Check whether the page containing `addr` is mapped.
    fn is_mapped(&self, addr: VirtAddr) -> bool;

    /// Map fresh frames over `[addr, addr + size)`.
    fn map(&mut self, addr: VirtAddr, size: usize, flags: PageFlags) -> Result<(), MappingError>;

    /// Unmap `[addr, addr + size)` and free the backing frames.
    fn unmap(&mut self, addr: VirtAddr, size: usize) -> Result<(), MappingError>;
}
