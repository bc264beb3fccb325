//! ARM64 Trap Entry
//!
//! Glue between the exception vectors and the dispatcher. The vector stub
//! saves the user registers into a [`TrapFrame`] and calls
//! [`handle_sync_lower_el`]; on return the (possibly updated) frame is
//! restored and `eret` resumes the process.
//!
//! # Register Convention
//! - x8: system call number
//! - x0-x4: arguments
//! - x0: result, sign-extended from 32 bits

use crate::kernel::Kernel;
use crate::process::{ExitReason, Pid};

/// User register state saved on the kernel stack
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct TrapFrame {
    /// General purpose registers x0-x30
    pub gpr: [u64; 31],
    /// Exception Link Register (return address)
    pub elr: u64,
    /// Saved Program Status Register
    pub spsr: u64,
    /// Exception Syndrome Register
    pub esr: u64,
    /// Fault Address Register
    pub far: u64,
}

impl TrapFrame {
    /// Call number and argument registers.
    pub fn syscall_args(&self) -> (usize, [usize; 5]) {
        let g = &self.gpr;
        (
            g[8] as usize,
            [g[0] as usize, g[1] as usize, g[2] as usize, g[3] as usize, g[4] as usize],
        )
    }

    /// Store a call result in x0.
    pub fn set_result(&mut self, result: i32) {
        self.gpr[0] = result as i64 as u64;
    }
}

/// Exception class extracted from ESR_EL1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExceptionClass {
    SvcAarch64 = 0x15,
    InstructionAbortLowerEl = 0x20,
    DataAbortLowerEl = 0x24,
    Other = 0xFF,
}

impl From<u64> for ExceptionClass {
    fn from(esr: u64) -> Self {
        match ((esr >> 26) & 0x3F) as u8 {
            0x15 => Self::SvcAarch64,
            0x20 => Self::InstructionAbortLowerEl,
            0x24 => Self::DataAbortLowerEl,
            _ => Self::Other,
        }
    }
}

/// What the vector stub should do after a trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapOutcome {
    /// Restore the frame and return to the process.
    Resume,
    /// The process was terminated; switch away.
    Terminated(Pid),
}

/// Handle an SVC: dispatch the call and write the result to x0.
pub fn handle_svc(kernel: &Kernel, frame: &mut TrapFrame) {
    let (number, args) = frame.syscall_args();
    let result = kernel.dispatch(number, args);
    frame.set_result(result);
}

/// Handle a synchronous exception taken from user mode.
///
/// System calls are dispatched. Any other synchronous exception is a fault
/// in the process, which is killed; the kernel keeps running.
pub fn handle_sync_lower_el(kernel: &Kernel, frame: &mut TrapFrame) -> TrapOutcome {
    let ec = ExceptionClass::from(frame.esr);

    match ec {
        ExceptionClass::SvcAarch64 => {
            handle_svc(kernel, frame);
            TrapOutcome::Resume
        }
        ExceptionClass::DataAbortLowerEl | ExceptionClass::InstructionAbortLowerEl => {
            log::warn!(
                "[EXCEPTION] User mode abort at {:#018x} (ESR {:#x}, ELR {:#x})",
                frame.far, frame.esr, frame.elr
            );
            kill_current(kernel)
        }
        _ => {
            log::warn!("[EXCEPTION] Unhandled exception from user mode: {:?}, ESR {:#x}", ec, frame.esr);
            kill_current(kernel)
        }
    }
}

fn kill_current(kernel: &Kernel) -> TrapOutcome {
    let pid = kernel.current();
    if kernel.terminate(pid, 0, ExitReason::Killed).is_ok() {
        log::info!("[PROCESS] {} terminated after fault", pid);
    }
    kernel.services().scheduler.retire(pid);
    TrapOutcome::Terminated(pid)
}
