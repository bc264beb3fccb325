//! The Kernel Boundary
//!
//! [`Kernel`] ties the boundary layer together: configuration, the
//! collaborators, the process table and dispatch statistics. Handlers are
//! implemented on it across the `syscall` submodules.

use alloc::ffi::CString;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

use spin::Mutex;

use crate::config::KernelConfig;
use crate::process::{Pid, Process, ProcessTable};
use crate::services::Services;
use crate::syscall::{SysResult, SyscallError};
use crate::window::WindowTable;

/// Kernel-side state shared by every trap.
pub struct Kernel {
    config: KernelConfig,
    services: Services,
    pub(crate) procs: Mutex<ProcessTable>,
    handler_invocations: AtomicUsize,
}

impl Kernel {
    pub fn new(config: KernelConfig, services: Services) -> Self {
        Self {
            config,
            services,
            procs: Mutex::new(ProcessTable::new()),
            handler_invocations: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    #[inline]
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Create the first user process.
    ///
    /// It has no parent (ppid 0) and starts with `windows`, typically the
    /// full-screen root window.
    pub fn spawn_root(&self, path: &str, windows: WindowTable) -> SysResult<Pid> {
        let pid = self.spawn(path, Pid::NONE, |_| Some(windows), Vec::new())?;
        log::info!("[PROCESS] root process {} started from {}", pid, path);
        Ok(pid)
    }

    /// Load `path` and admit it as a child of `parent`.
    ///
    /// `windows` picks the new process's window table under the table lock,
    /// so an inherited snapshot is taken at the same instant the child
    /// becomes visible. Nothing is inserted or admitted unless every step
    /// succeeds.
    pub(crate) fn spawn<F>(
        &self,
        path: &str,
        parent: Pid,
        windows: F,
        args: Vec<CString>,
    ) -> SysResult<Pid>
    where
        F: FnOnce(&ProcessTable) -> Option<WindowTable>,
    {
        let image = self.services.loader.load(path).ok_or_else(|| {
            log::debug!("[PROCESS] spawn: cannot load {}", path);
            SyscallError::NoEntry
        })?;

        let pid = {
            let mut procs = self.procs.lock();
            let windows = windows(&*procs).ok_or(SyscallError::NoEntry)?;
            let pid = procs.allocate_pid();
            let mut process = Process::new(pid, parent, image);
            process.set_windows(windows);
            process.set_args(args);
            procs.insert(process);
            pid
        };

        self.services.scheduler.admit(pid);
        Ok(pid)
    }

    /// The process this trap runs for.
    #[inline]
    pub(crate) fn current(&self) -> Pid {
        self.services.scheduler.current()
    }

    /// Number of handler runs since boot.
    ///
    /// Decoding failures and unknown call numbers do not count.
    pub fn handler_invocations(&self) -> usize {
        self.handler_invocations.load(Ordering::Relaxed)
    }

    pub(crate) fn count_invocation(&self) {
        self.handler_invocations.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of process records, including unreaped ones.
    pub fn process_count(&self) -> usize {
        self.procs.lock().len()
    }

    /// Inspect a process record.
    pub fn with_process<R>(&self, pid: Pid, f: impl FnOnce(&Process) -> R) -> Option<R> {
        self.procs.lock().get(pid).map(f)
    }
}
