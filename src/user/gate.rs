//! Syscall Gate
//!
//! [`SyscallGate`] is the one place user code traps into the kernel. The
//! functions in this module wrap each call with typed arguments and turn
//! the raw `i32` result back into a [`SysResult`].
//!
//! ```ignore
//! use panthergate::user::{gate, Svc};
//!
//! let me = gate::process_self(&Svc)?;
//! gate::debug(&Svc, c"hello\n")?;
//! ```

use alloc::vec::Vec;
use core::ffi::CStr;

use crate::process::ProcessInfo;
use crate::syscall::numbers::*;
use crate::syscall::{SysResult, SyscallError};
use crate::window::GraphicsCommand;

/// Something that can issue a system call.
pub trait SyscallGate {
    /// Trap with call `number` and arguments `args` (x0-x4).
    fn syscall(&self, number: usize, args: [usize; 5]) -> i32;
}

impl<G: SyscallGate + ?Sized> SyscallGate for &G {
    fn syscall(&self, number: usize, args: [usize; 5]) -> i32 {
        (**self).syscall(number, args)
    }
}

/// The `svc #0` instruction.
#[cfg(all(target_arch = "aarch64", target_os = "none"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct Svc;

#[cfg(all(target_arch = "aarch64", target_os = "none"))]
impl SyscallGate for Svc {
    fn syscall(&self, number: usize, args: [usize; 5]) -> i32 {
        let ret: usize;
        // SAFETY:
        // - The kernel only reads x0-x4 and x8 and writes x0
        // - Pointer arguments are validated kernel-side before use
        unsafe {
            core::arch::asm!(
                "svc #0",
                inlateout("x0") args[0] => ret,
                in("x1") args[1],
                in("x2") args[2],
                in("x3") args[3],
                in("x4") args[4],
                in("x8") number,
                options(nostack),
            );
        }
        ret as i32
    }
}

/// Interpret a raw result.
pub fn check(ret: i32) -> SysResult<usize> {
    if ret >= 0 {
        Ok(ret as usize)
    } else {
        Err(SyscallError::from_code(ret).unwrap_or(SyscallError::InvalidArgument))
    }
}

fn call<G: SyscallGate>(gate: &G, number: usize, args: [usize; 5]) -> SysResult<usize> {
    check(gate.syscall(number, args))
}

/// Terminate the calling process.
pub fn exit<G: SyscallGate>(gate: &G, status: i32) {
    gate.syscall(SYS_EXIT, [status as usize, 0, 0, 0, 0]);
}

/// Write a string to the kernel console.
pub fn debug<G: SyscallGate>(gate: &G, text: &CStr) -> SysResult<()> {
    call(gate, SYS_DEBUG, [text.as_ptr() as usize, 0, 0, 0, 0]).map(|_| ())
}

pub fn yield_now<G: SyscallGate>(gate: &G) -> SysResult<()> {
    call(gate, SYS_YIELD, [0; 5]).map(|_| ())
}

/// Grow the heap by `delta` bytes; returns the previous break.
pub fn sbrk<G: SyscallGate>(gate: &G, delta: isize) -> SysResult<usize> {
    call(gate, SYS_SBRK, [delta as usize, 0, 0, 0, 0])
}

/// Next key code, or `WouldBlock` if none is buffered.
pub fn keyboard_read_char<G: SyscallGate>(gate: &G) -> SysResult<u32> {
    call(gate, SYS_KEYBOARD_READ_CHAR, [0; 5]).map(|code| code as u32)
}

/// Create a child of window `window`; returns the new window index.
pub fn draw_create<G: SyscallGate>(
    gate: &G,
    window: usize,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
) -> SysResult<usize> {
    call(
        gate,
        SYS_DRAW_CREATE,
        [window, x as usize, y as usize, w as usize, h as usize],
    )
}

/// Submit a command list ending in [`GraphicsCommand::end`].
///
/// Returns the compositor's result; `-1` arrives as `InvalidArgument`'s code.
pub fn draw_write<G: SyscallGate>(gate: &G, commands: &[GraphicsCommand]) -> SysResult<i32> {
    if !commands.last().is_some_and(GraphicsCommand::is_end) {
        return Err(SyscallError::InvalidArgument);
    }
    Ok(gate.syscall(SYS_DRAW_WRITE, [commands.as_ptr() as usize, 0, 0, 0, 0]))
}

pub fn sleep<G: SyscallGate>(gate: &G, ms: u32) -> SysResult<()> {
    call(gate, SYS_SLEEP, [ms as usize, 0, 0, 0, 0]).map(|_| ())
}

/// Seconds since the Unix epoch. This call cannot fail.
pub fn gettimeofday<G: SyscallGate>(gate: &G) -> u32 {
    gate.syscall(SYS_GETTIMEOFDAY, [0; 5]) as u32
}

pub fn process_self<G: SyscallGate>(gate: &G) -> SysResult<u32> {
    call(gate, SYS_PROCESS_SELF, [0; 5]).map(|pid| pid as u32)
}

pub fn process_parent<G: SyscallGate>(gate: &G) -> SysResult<u32> {
    call(gate, SYS_PROCESS_PARENT, [0; 5]).map(|pid| pid as u32)
}

/// Start `path` with arguments `argv`; returns the child's pid.
pub fn process_run<G: SyscallGate>(gate: &G, path: &CStr, argv: &[&CStr]) -> SysResult<u32> {
    let ptrs: Vec<usize> = argv.iter().map(|arg| arg.as_ptr() as usize).collect();
    call(
        gate,
        SYS_PROCESS_RUN,
        [path.as_ptr() as usize, ptrs.as_ptr() as usize, ptrs.len(), 0, 0],
    )
    .map(|pid| pid as u32)
}

pub fn process_kill<G: SyscallGate>(gate: &G, pid: u32) -> SysResult<()> {
    call(gate, SYS_PROCESS_KILL, [pid as usize, 0, 0, 0, 0]).map(|_| ())
}

/// Wait for a child to exit. A negative `timeout_ms` waits forever.
pub fn process_wait<G: SyscallGate>(gate: &G, timeout_ms: i32) -> SysResult<ProcessInfo> {
    let mut info = ProcessInfo::default();
    let ptr = &mut info as *mut ProcessInfo as usize;
    call(gate, SYS_PROCESS_WAIT, [ptr, timeout_ms as usize, 0, 0, 0])?;
    Ok(info)
}

pub fn process_reap<G: SyscallGate>(gate: &G, pid: u32) -> SysResult<()> {
    call(gate, SYS_PROCESS_REAP, [pid as usize, 0, 0, 0, 0]).map(|_| ())
}
