//! System Call Dispatcher
//!
//! The single entry from user mode into kernel services. A trap is decoded
//! into a [`Syscall`], exactly one handler runs, and its result is packed
//! into the return register.
//!
//! # Result Convention
//! - Non-negative: success, or the value the call produces
//! - Negative: a [`SyscallError`] code
//! - `-1` ([`UNKNOWN_CALL`]): the number names no call; no handler ran
//!
//! `gettimeofday` is the exception: its register holds a `u32` timestamp.
//!
//! Handlers surface their own errors; nothing here retries or logs a
//! handler call.

use super::decode::{DecodeError, Syscall};
use super::error::{encode, SyscallError, UNKNOWN_CALL};
use crate::kernel::Kernel;

impl Kernel {
    /// Dispatch a system call
    ///
    /// # Arguments
    /// * `number` - System call number (from x8)
    /// * `args` - Argument registers x0-x4
    ///
    /// # Returns
    /// Result value to be placed in x0
    pub fn dispatch(&self, number: usize, args: [usize; 5]) -> i32 {
        match Syscall::decode(number, args, &self.config().user_region) {
            Ok(call) => self.invoke(call),
            Err(DecodeError::UnknownCall(number)) => {
                log::warn!("[SYSCALL] Unknown syscall: {}", number);
                UNKNOWN_CALL
            }
            Err(DecodeError::BadArgument(e)) => {
                log::debug!("[SYSCALL] #{} rejected at decode: {}", number, e);
                e.code()
            }
        }
    }

    /// Run the handler for one decoded call.
    pub fn invoke(&self, call: Syscall) -> i32 {
        self.count_invocation();
        match call {
            Syscall::Exit { status } => encode(self.sys_exit(status)),
            Syscall::Debug { text } => encode(self.sys_debug(&text)),
            Syscall::Yield => encode(self.sys_yield()),
            Syscall::Open { .. }
            | Syscall::Read { .. }
            | Syscall::Write { .. }
            | Syscall::Lseek { .. }
            | Syscall::Close { .. } => encode(Err(SyscallError::NotImplemented)),
            Syscall::Sbrk { delta } => encode(self.sys_sbrk(delta)),
            Syscall::KeyboardReadChar => encode(self.sys_keyboard_read_char()),
            Syscall::DrawCreate { window, x, y, w, h } => {
                encode(self.sys_draw_create(window, x, y, w, h))
            }
            Syscall::DrawWrite { commands } => self.sys_draw_write(&commands),
            Syscall::Sleep { ms } => encode(self.sys_sleep(ms)),
            // Raw u32 bits; user space never reads this result as an error.
            Syscall::GetTimeOfDay => self.sys_gettimeofday() as i32,
            Syscall::ProcessSelf => encode(self.sys_process_self()),
            Syscall::ProcessParent => encode(self.sys_process_parent()),
            Syscall::ProcessRun { path, argv } => encode(self.sys_process_run(&path, argv)),
            Syscall::ProcessKill { pid } => encode(self.sys_process_kill(pid)),
            Syscall::ProcessWait { info, timeout } => {
                encode(self.sys_process_wait(&info, timeout))
            }
            Syscall::ProcessReap { pid } => encode(self.sys_process_reap(pid)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::syscall::numbers::*;
    use crate::syscall::{SyscallError, UNKNOWN_CALL};
    use crate::testing::Harness;

    #[test]
    fn unknown_call_runs_no_handler() {
        let h = Harness::with_root();
        let before = h.kernel.handler_invocations();

        assert_eq!(h.kernel.dispatch(0, [0; 5]), UNKNOWN_CALL);
        assert_eq!(h.kernel.dispatch(4242, [1, 2, 3, 4, 5]), UNKNOWN_CALL);
        assert_eq!(h.kernel.handler_invocations(), before);
    }

    #[test]
    fn every_known_call_runs_exactly_one_handler() {
        let h = Harness::with_root();
        let before = h.kernel.handler_invocations();
        h.kernel.dispatch(SYS_YIELD, [0; 5]);
        h.kernel.dispatch(SYS_PROCESS_SELF, [0; 5]);
        assert_eq!(h.kernel.handler_invocations(), before + 2);
    }

    #[test]
    fn decode_failure_runs_no_handler() {
        let h = Harness::with_root();
        let before = h.kernel.handler_invocations();
        assert_eq!(h.kernel.dispatch(SYS_DEBUG, [0; 5]), SyscallError::Fault.code());
        assert_eq!(h.kernel.handler_invocations(), before);
    }

    #[test]
    fn file_calls_are_not_implemented() {
        let h = Harness::with_root();
        for number in [SYS_OPEN, SYS_READ, SYS_WRITE, SYS_LSEEK, SYS_CLOSE] {
            let ret = h.kernel.dispatch(number, [0; 5]);
            assert_eq!(ret, SyscallError::NotImplemented.code());
            assert_ne!(ret, UNKNOWN_CALL);
        }
    }
}
