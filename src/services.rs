//! External Collaborators
//!
//! The boundary layer calls into other kernel subsystems but owns none of
//! them. Each subsystem is reached through one trait here; a kernel build
//! bundles its implementations into [`Services`].
//!
//! | Trait | Subsystem |
//! |-------|-----------|
//! | [`Scheduler`] | run queue and context switching |
//! | [`ImageLoader`] | executable parsing and address-space setup |
//! | [`Compositor`] | window surfaces and the graphics interpreter |
//! | [`Clock`] | monotonic uptime |
//! | [`RealTimeClock`] | wall-clock date and time |
//! | [`Keyboard`] | buffered key codes |
//! | [`Console`] | the debug console |

use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::mm::{AddressSpace, VirtAddr};
use crate::process::Pid;
use crate::time::RtcTime;
use crate::window::{GraphicsCommand, Surface, SurfaceId, WindowTable};

/// Run-queue operations.
pub trait Scheduler: Send + Sync {
    /// The process on whose behalf the current trap is running.
    fn current(&self) -> Pid;

    /// Add a process to the ready set.
    fn admit(&self, pid: Pid);

    /// Give up the rest of the current quantum.
    ///
    /// Returns once the caller is scheduled again.
    fn yield_now(&self);

    /// Remove a process from scheduling for good.
    ///
    /// When `pid` is the current process this does not return on real
    /// hardware: the scheduler switches to another process.
    fn retire(&self, pid: Pid);
}

/// A freshly loaded executable, ready to become a process.
pub struct LoadedImage {
    /// Address space with the image's segments mapped.
    pub space: Box<dyn AddressSpace>,
    /// First byte past the loaded segments; the heap starts here.
    pub heap_base: VirtAddr,
}

/// Executable image loader.
pub trait ImageLoader: Send + Sync {
    /// Load the executable at `path`.
    ///
    /// Returns `None` if the path does not resolve or the image is invalid.
    fn load(&self, path: &str) -> Option<LoadedImage>;
}

/// Window surface registry and graphics command interpreter.
pub trait Compositor: Send + Sync {
    /// Create a new surface nested in `parent`.
    fn create(&self, parent: &Surface) -> Option<SurfaceId>;

    /// The last reference to `id` is gone.
    fn release(&self, id: SurfaceId);

    /// Execute `commands` against the caller's windows.
    fn write(&self, windows: &WindowTable, commands: &[GraphicsCommand]) -> i32;
}

/// Monotonic time source.
pub trait Clock: Send + Sync {
    /// Milliseconds since boot.
    fn uptime_ms(&self) -> u64;
}

/// Real-time clock driver.
pub trait RealTimeClock: Send + Sync {
    fn read(&self) -> RtcTime;
}

/// Keyboard input buffer.
pub trait Keyboard: Send + Sync {
    /// Next buffered key code, if any.
    fn read(&self) -> Option<u32>;
}

/// Kernel debug console.
pub trait Console: Send + Sync {
    /// Write raw bytes. Never fails.
    fn write(&self, bytes: &[u8]);
}

/// Every collaborator the boundary layer needs.
#[derive(Clone)]
pub struct Services {
    pub scheduler: Arc<dyn Scheduler>,
    pub loader: Arc<dyn ImageLoader>,
    pub compositor: Arc<dyn Compositor>,
    pub clock: Arc<dyn Clock>,
    pub rtc: Arc<dyn RealTimeClock>,
    pub keyboard: Arc<dyn Keyboard>,
    pub console: Arc<dyn Console>,
}
