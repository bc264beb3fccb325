//! Process lifecycle syscalls
//!
//! Spawn, exit, kill, wait, reap, yield and identity queries.
//!
//! # Suspension Points
//! Only `yield` and `wait` give up the CPU here; everything else runs to
//! completion inside the trap.

use alloc::ffi::CString;
use alloc::vec::Vec;

use super::error::{SysResult, SyscallError};
use super::validate::UserPtr;
use crate::kernel::Kernel;
use crate::process::{ExitReason, Pid, ProcessInfo};

impl Kernel {
    /// exit(status) - terminate the calling process
    ///
    /// Releases the address space and window references, then retires the
    /// process from scheduling. The caller never observes the return value.
    pub(crate) fn sys_exit(&self, status: i32) -> SysResult<usize> {
        let pid = self.current();
        self.terminate(pid, status, ExitReason::Normal)?;
        log::info!("[PROCESS] {} exited with status {}", pid, status);
        self.services().scheduler.retire(pid);
        Ok(0)
    }

    /// yield() - give up the rest of the quantum
    pub(crate) fn sys_yield(&self) -> SysResult<usize> {
        self.services().scheduler.yield_now();
        Ok(0)
    }

    pub(crate) fn sys_process_self(&self) -> SysResult<usize> {
        Ok(self.current().as_u32() as usize)
    }

    pub(crate) fn sys_process_parent(&self) -> SysResult<usize> {
        let pid = self.current();
        self.procs
            .lock()
            .get(pid)
            .map(|p| p.ppid().as_u32() as usize)
            .ok_or(SyscallError::NoEntry)
    }

    /// process_run(path, argv, argc) - start a child process
    ///
    /// The child inherits every window the caller holds at this instant
    /// (each shared surface gains one holder) and receives `argv`.
    pub(crate) fn sys_process_run(&self, path: &str, argv: Vec<CString>) -> SysResult<usize> {
        let parent = self.current();
        let child = self.spawn(
            path,
            parent,
            |procs| procs.get(parent).map(|p| p.windows().inherit()),
            argv,
        )?;
        log::info!("[PROCESS] {} spawned {} from {}", parent, child, path);
        Ok(child.as_u32() as usize)
    }

    /// process_kill(pid) - terminate another process
    pub(crate) fn sys_process_kill(&self, pid: Pid) -> SysResult<usize> {
        self.terminate(pid, 0, ExitReason::Killed)?;
        log::info!("[PROCESS] {} killed by {}", pid, self.current());
        self.services().scheduler.retire(pid);
        Ok(0)
    }

    /// process_wait(info, timeout) - wait for a child to terminate
    ///
    /// Returns the lowest-numbered exited child without reaping it. A
    /// negative timeout waits for as long as it takes.
    pub(crate) fn sys_process_wait(
        &self,
        info: &UserPtr<ProcessInfo>,
        timeout_ms: i32,
    ) -> SysResult<usize> {
        let parent = self.current();
        let clock = &self.services().clock;
        let start = clock.uptime_ms();

        loop {
            {
                let procs = self.procs.lock();
                if !procs.has_children(parent) {
                    return Err(SyscallError::NoChild);
                }
                if let Some(record) = procs.exited_child(parent).and_then(|p| p.exit_info()) {
                    info.write(record);
                    return Ok(0);
                }
            }

            if timeout_ms >= 0 {
                let elapsed = clock.uptime_ms().saturating_sub(start);
                if elapsed >= timeout_ms as u64 {
                    log::debug!("[PROCESS] {} wait timed out after {} ms", parent, elapsed);
                    return Err(SyscallError::TimedOut);
                }
            }
            self.services().scheduler.yield_now();
        }
    }

    /// process_reap(pid) - discard an exited child's record
    pub(crate) fn sys_process_reap(&self, pid: Pid) -> SysResult<usize> {
        let parent = self.current();
        let mut procs = self.procs.lock();
        match procs.get(pid) {
            Some(p) if p.ppid() == parent && !p.is_live() => {
                procs.remove(pid);
                log::info!("[PROCESS] {} reaped {}", parent, pid);
                Ok(0)
            }
            _ => {
                log::debug!("[PROCESS] reap: {} is not an exited child of {}", pid, parent);
                Err(SyscallError::NoEntry)
            }
        }
    }

    /// Move a live process to `Exited`, releasing what it owns.
    pub(crate) fn terminate(&self, pid: Pid, status: i32, reason: ExitReason) -> SysResult<()> {
        let mut procs = self.procs.lock();
        let process = procs.get_live_mut(pid).ok_or_else(|| {
            log::debug!("[PROCESS] {} is not a live process", pid);
            SyscallError::NoEntry
        })?;
        process.terminate(status, reason);
        Ok(())
    }
}
