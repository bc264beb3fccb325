//! Virtual Address Type
//!
//! Type-safe wrapper for user virtual addresses so heap and mapping code
//! cannot confuse an address with a length or a page count.

use core::fmt;

/// Page size (4 KiB)
pub const PAGE_SIZE: usize = 4096;
/// Page size mask
pub const PAGE_MASK: usize = PAGE_SIZE - 1;

/// A virtual memory address.
///
/// Addresses are kept in ARM64 canonical form (sign-extended from bit 47).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct VirtAddr(usize);

impl VirtAddr {
    /// Create a new virtual address in canonical form.
    #[inline]
    pub const fn new(addr: usize) -> Self {
        Self(Self::make_canonical(addr))
    }

    #[inline]
    const fn make_canonical(addr: usize) -> usize {
        let bit47 = (addr >> 47) & 1;
        if bit47 == 1 {
            addr | 0xFFFF_0000_0000_0000
        } else {
            addr & 0x0000_FFFF_FFFF_FFFF
        }
    }

    /// Get the raw address value.
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Check if the address is page-aligned.
    #[inline]
    pub const fn is_aligned(self) -> bool {
        self.0 & PAGE_MASK == 0
    }

    /// Align the address down to the nearest page boundary.
    #[inline]
    pub const fn align_down(self) -> Self {
        Self::new(self.0 & !PAGE_MASK)
    }

    /// Align the address up to the nearest page boundary.
    #[inline]
    pub const fn align_up(self) -> Self {
        Self::new((self.0 + PAGE_MASK) & !PAGE_MASK)
    }

    /// Get the page offset (lowest 12 bits).
    #[inline]
    pub const fn page_offset(self) -> usize {
        self.0 & PAGE_MASK
    }

    /// Add an offset, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(self, offset: usize) -> Option<Self> {
        match self.0.checked_add(offset) {
            Some(addr) => Some(Self::new(addr)),
            None => None,
        }
    }
}

impl fmt::Debug for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VirtAddr({:#018x})", self.0)
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Iterate over the page-aligned addresses of every page that intersects
/// `[start, end)`.
pub fn pages_covering(start: VirtAddr, end: VirtAddr) -> impl Iterator<Item = VirtAddr> {
    let first = start.align_down().as_usize();
    let last = end.align_up().as_usize();
    (first..last).step_by(PAGE_SIZE).map(VirtAddr::new)
}
