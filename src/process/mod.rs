//! Processes
//!
//! The kernel-side record of a user process as seen by the boundary layer:
//! identity, place in the process tree, heap, windows, arguments.
//!
//! # Lifecycle
//! ```text
//!   process_run ──► Ready ──exit/kill──► Exited ──reap──► (gone)
//! ```
//! Entering `Exited` releases the address space and every window reference
//! at once. The record itself stays until the parent reaps it so the exit
//! status can be collected with `wait`.

mod table;

use alloc::boxed::Box;
use alloc::ffi::CString;
use alloc::vec::Vec;
use core::fmt;

use crate::mm::{AddressSpace, GrowError, HeapBreak, MappingError, VirtAddr};
use crate::services::LoadedImage;
use crate::window::WindowTable;

pub use table::ProcessTable;

/// A process identifier.
///
/// Pid 0 is never assigned; it is the parent of the root process.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct Pid(u32);

impl Pid {
    /// Parent of the root process.
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a process stopped running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitReason {
    /// Called `exit`.
    Normal = 0,
    /// Terminated by `kill`.
    Killed = 1,
}

/// Scheduling state as far as this layer cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Admitted to the ready set.
    Ready,
    /// Terminated, waiting to be reaped.
    Exited { status: i32, reason: ExitReason },
}

/// Termination record written to user space by `wait`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct ProcessInfo {
    pub exitcode: i32,
    pub exitreason: i32,
    pub pid: i32,
}

/// A user process.
pub struct Process {
    pid: Pid,
    ppid: Pid,
    state: ProcessState,
    space: Option<Box<dyn AddressSpace>>,
    heap: HeapBreak,
    windows: WindowTable,
    args: Vec<CString>,
}

impl Process {
    /// Build a process around a loaded image.
    pub fn new(pid: Pid, ppid: Pid, image: LoadedImage) -> Self {
        Self {
            pid,
            ppid,
            state: ProcessState::Ready,
            space: Some(image.space),
            heap: HeapBreak::new(image.heap_base),
            windows: WindowTable::new(),
            args: Vec::new(),
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn ppid(&self) -> Pid {
        self.ppid
    }

    #[inline]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        matches!(self.state, ProcessState::Ready)
    }

    /// Current break pointer.
    #[inline]
    pub fn brk(&self) -> VirtAddr {
        self.heap.current()
    }

    #[inline]
    pub fn windows(&self) -> &WindowTable {
        &self.windows
    }

    #[inline]
    pub fn windows_mut(&mut self) -> &mut WindowTable {
        &mut self.windows
    }

    /// Replace the window table wholesale.
    pub fn set_windows(&mut self, windows: WindowTable) {
        self.windows = windows;
    }

    /// Arguments passed at spawn, `argv[0]` first.
    #[inline]
    pub fn args(&self) -> &[CString] {
        &self.args
    }

    pub fn set_args(&mut self, args: Vec<CString>) {
        self.args = args;
    }

    /// The address space, if the process has not exited.
    pub fn space(&self) -> Option<&dyn AddressSpace> {
        self.space.as_deref()
    }

    /// Grow the heap by `delta` bytes, returning the previous break.
    pub fn grow_heap(&mut self, delta: usize, limit: VirtAddr) -> Result<VirtAddr, GrowError> {
        let space = self
            .space
            .as_deref_mut()
            .ok_or(GrowError::Mapping(MappingError::NotMapped))?;
        self.heap.grow(space, delta, limit)
    }

    /// Enter the `Exited` state and release owned resources.
    ///
    /// The address space is dropped; window references are released, which
    /// frees a surface only if no other process still holds it.
    pub fn terminate(&mut self, status: i32, reason: ExitReason) {
        self.state = ProcessState::Exited { status, reason };
        self.space = None;
        self.windows.clear();
        self.args.clear();
    }

    /// Termination record, once exited.
    pub fn exit_info(&self) -> Option<ProcessInfo> {
        match self.state {
            ProcessState::Exited { status, reason } => Some(ProcessInfo {
                exitcode: status,
                exitreason: reason as i32,
                pid: self.pid.as_u32() as i32,
            }),
            ProcessState::Ready => None,
        }
    }
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("pid", &self.pid)
            .field("ppid", &self.ppid)
            .field("state", &self.state)
            .field("brk", &self.heap.current())
            .field("windows", &self.windows.len())
            .finish()
    }
}
