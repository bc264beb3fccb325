//! User-Space Heap
//!
//! A global allocator for user programs. The heap starts empty and grows
//! through `sbrk` whenever an allocation does not fit.
//!
//! ```ignore
//! #[global_allocator]
//! static HEAP: UserHeap<Sbrk<Svc>> = UserHeap::new(Sbrk(Svc));
//! ```

use core::alloc::{GlobalAlloc, Layout};
use core::ptr::{self, NonNull};

use linked_list_allocator::Heap;
use spin::Mutex;

use super::gate::{self, SyscallGate};
use crate::mm::PAGE_SIZE;

/// Smallest amount the heap grows by.
pub const MIN_GROWTH: usize = 16 * PAGE_SIZE;

/// Where fresh heap memory comes from.
pub trait BreakSource {
    /// Move the break up by `bytes`; returns the old break.
    fn grow(&self, bytes: usize) -> Option<*mut u8>;
}

/// Grows the heap with the `sbrk` system call.
#[derive(Debug, Clone, Copy)]
pub struct Sbrk<G>(pub G);

impl<G: SyscallGate> BreakSource for Sbrk<G> {
    fn grow(&self, bytes: usize) -> Option<*mut u8> {
        let delta = isize::try_from(bytes).ok()?;
        gate::sbrk(&self.0, delta).ok().map(|old| old as *mut u8)
    }
}

/// A `GlobalAlloc` over a break-pointer heap.
pub struct UserHeap<B: BreakSource> {
    source: B,
    heap: Mutex<Heap>,
}

impl<B: BreakSource> UserHeap<B> {
    pub const fn new(source: B) -> Self {
        Self { source, heap: Mutex::new(Heap::empty()) }
    }

    /// Bytes currently under management.
    pub fn size(&self) -> usize {
        self.heap.lock().size()
    }

    /// Add enough memory for `layout`. The new region must continue the
    /// existing heap; anything else is refused.
    fn grow(&self, heap: &mut Heap, layout: Layout) -> bool {
        let needed = match layout.size().checked_add(layout.align()) {
            Some(n) => n,
            None => return false,
        };
        let bytes = match needed.checked_next_multiple_of(PAGE_SIZE) {
            Some(n) => n.max(MIN_GROWTH),
            None => return false,
        };
        let Some(start) = self.source.grow(bytes) else {
            return false;
        };

        if heap.size() == 0 {
            // SAFETY: the source handed us `bytes` fresh bytes at `start`
            unsafe { heap.init(start, bytes) };
            true
        } else if start == heap.top() {
            // SAFETY: the new memory directly follows the current top
            unsafe { heap.extend(bytes) };
            true
        } else {
            false
        }
    }
}

unsafe impl<B: BreakSource + Sync> GlobalAlloc for UserHeap<B> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let mut heap = self.heap.lock();
        if let Ok(block) = heap.allocate_first_fit(layout) {
            return block.as_ptr();
        }
        if !self.grow(&mut heap, layout) {
            return ptr::null_mut();
        }
        heap.allocate_first_fit(layout)
            .map_or(ptr::null_mut(), |block| block.as_ptr())
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if let Some(block) = NonNull::new(ptr) {
            // SAFETY: `ptr` came from `alloc` with the same layout
            unsafe { self.heap.lock().deallocate(block, layout) };
        }
    }
}
