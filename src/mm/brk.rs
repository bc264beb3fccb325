//! Demand-Paged Heap Growth
//!
//! A process heap is a break pointer plus the pages mapped below it.
//!
//! # Invariant
//! Every page intersecting `[base, brk)` is mapped user read/write.
//!
//! Growth maps only the pages not already present and never unmaps on
//! success. If a mapping fails part way, the pages mapped by that call are
//! released again and the break does not move.

use alloc::vec::Vec;

use super::address::{pages_covering, VirtAddr, PAGE_SIZE};
use super::paging::{MappingError, PageFlags};
use super::space::AddressSpace;

/// Why a heap could not grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowError {
    /// The new break would pass the configured heap limit.
    LimitExceeded,
    /// The page-table layer refused a mapping.
    Mapping(MappingError),
}

/// The break pointer of one process heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapBreak {
    brk: VirtAddr,
}

impl HeapBreak {
    /// Start an empty heap at `base`.
    pub const fn new(base: VirtAddr) -> Self {
        Self { brk: base }
    }

    /// Current break pointer.
    #[inline]
    pub const fn current(&self) -> VirtAddr {
        self.brk
    }

    /// Grow the heap by `delta` bytes.
    ///
    /// Returns the previous break, i.e. the start of the newly usable region.
    /// A zero delta maps nothing.
    pub fn grow(
        &mut self,
        space: &mut dyn AddressSpace,
        delta: usize,
        limit: VirtAddr,
    ) -> Result<VirtAddr, GrowError> {
        let old = self.brk;
        let end = old
            .as_usize()
            .checked_add(delta)
            .filter(|&end| end <= limit.as_usize())
            .ok_or(GrowError::LimitExceeded)?;
        let new = VirtAddr::new(end);

        let mut mapped: Vec<VirtAddr> = Vec::new();
        for page in pages_covering(old, new) {
            if space.is_mapped(page) {
                continue;
            }
            if let Err(e) = space.map(page, PAGE_SIZE, PageFlags::USER_DATA) {
                log::debug!("[BRK] map {} failed: {}, rolling back {} pages", page, e, mapped.len());
                for undo in mapped.iter().rev() {
                    if let Err(e) = space.unmap(*undo, PAGE_SIZE) {
                        log::warn!("[BRK] rollback unmap {} failed: {}, page leaked", undo, e);
                    }
                }
                return Err(GrowError::Mapping(e));
            }
            mapped.push(page);
        }

        log::trace!("[BRK] {} -> {} ({} new pages)", old, new, mapped.len());
        self.brk = new;
        Ok(old)
    }
}
