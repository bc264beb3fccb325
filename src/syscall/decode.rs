//! Typed System Call Decoding
//!
//! Turns a call number and five untyped registers into a [`Syscall`]
//! variant. Integers are narrowed, pointers are validated against the user
//! region and their targets copied into kernel memory, so handlers only
//! ever see typed, kernel-owned arguments.
//!
//! Decoding does not check semantics (whether a pid exists, whether a
//! rectangle fits): that is each handler's job.

use alloc::ffi::CString;
use alloc::string::String;
use alloc::vec::Vec;
use core::mem::size_of;

use super::error::SyscallError;
use super::numbers::*;
use super::validate::{self, UserPtr};
use crate::config::{
    UserRegion, MAX_ARGS, MAX_ARG_LEN, MAX_GRAPHICS_COMMANDS, MAX_PATH_LEN,
};
use crate::process::{Pid, ProcessInfo};
use crate::window::GraphicsCommand;

/// One decoded system call.
#[derive(Debug)]
pub enum Syscall {
    Exit { status: i32 },
    Debug { text: Vec<u8> },
    Yield,
    Open { path: usize, mode: i32, flags: i32 },
    Read { fd: i32, buf: usize, len: i32 },
    Write { fd: i32, buf: usize, len: i32 },
    Lseek { fd: i32, offset: i32, whence: i32 },
    Close { fd: i32 },
    Sbrk { delta: isize },
    KeyboardReadChar,
    DrawCreate { window: i32, x: i32, y: i32, w: i32, h: i32 },
    DrawWrite { commands: Vec<GraphicsCommand> },
    Sleep { ms: u32 },
    GetTimeOfDay,
    ProcessSelf,
    ProcessParent,
    ProcessRun { path: String, argv: Vec<CString> },
    ProcessKill { pid: Pid },
    ProcessWait { info: UserPtr<ProcessInfo>, timeout: i32 },
    ProcessReap { pid: Pid },
}

/// Why a trap could not be turned into a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The number names no call.
    UnknownCall(usize),
    /// A known call with unusable arguments.
    BadArgument(SyscallError),
}

impl From<SyscallError> for DecodeError {
    fn from(e: SyscallError) -> Self {
        Self::BadArgument(e)
    }
}

impl Syscall {
    /// Decode the registers of one trap.
    pub fn decode(number: usize, args: [usize; 5], region: &UserRegion) -> Result<Self, DecodeError> {
        let [a, b, c, d, e] = args;
        let call = match number {
            SYS_EXIT => Self::Exit { status: a as i32 },
            SYS_DEBUG => Self::Debug {
                text: validate::copy_cstr_unbounded(region, a)?,
            },
            SYS_YIELD => Self::Yield,
            SYS_OPEN => Self::Open { path: a, mode: b as i32, flags: c as i32 },
            SYS_READ => Self::Read { fd: a as i32, buf: b, len: c as i32 },
            SYS_WRITE => Self::Write { fd: a as i32, buf: b, len: c as i32 },
            SYS_LSEEK => Self::Lseek { fd: a as i32, offset: b as i32, whence: c as i32 },
            SYS_CLOSE => Self::Close { fd: a as i32 },
            SYS_SBRK => Self::Sbrk { delta: a as isize },
            SYS_KEYBOARD_READ_CHAR => Self::KeyboardReadChar,
            SYS_DRAW_CREATE => Self::DrawCreate {
                window: a as i32,
                x: b as i32,
                y: c as i32,
                w: d as i32,
                h: e as i32,
            },
            SYS_DRAW_WRITE => Self::DrawWrite { commands: copy_commands(region, a)? },
            SYS_SLEEP => Self::Sleep { ms: a as u32 },
            SYS_GETTIMEOFDAY => Self::GetTimeOfDay,
            SYS_PROCESS_SELF => Self::ProcessSelf,
            SYS_PROCESS_PARENT => Self::ProcessParent,
            SYS_PROCESS_RUN => Self::ProcessRun {
                path: copy_path(region, a)?,
                argv: copy_argv(region, b, c as i32)?,
            },
            SYS_PROCESS_KILL => Self::ProcessKill { pid: Pid::new(a as u32) },
            SYS_PROCESS_WAIT => Self::ProcessWait {
                info: validate::validate_user_write(region, a)?,
                timeout: b as i32,
            },
            SYS_PROCESS_REAP => Self::ProcessReap { pid: Pid::new(a as u32) },
            _ => return Err(DecodeError::UnknownCall(number)),
        };
        Ok(call)
    }
}

fn copy_path(region: &UserRegion, ptr: usize) -> Result<String, SyscallError> {
    let bytes = validate::copy_cstr(region, ptr, MAX_PATH_LEN)?;
    // A path that is not UTF-8 cannot name anything the loader knows.
    String::from_utf8(bytes).map_err(|_| SyscallError::NoEntry)
}

fn copy_argv(region: &UserRegion, ptr: usize, argc: i32) -> Result<Vec<CString>, SyscallError> {
    let argc = usize::try_from(argc).map_err(|_| SyscallError::InvalidArgument)?;
    if argc > MAX_ARGS {
        return Err(SyscallError::InvalidArgument);
    }

    let mut argv = Vec::with_capacity(argc);
    for i in 0..argc {
        let slot = ptr
            .checked_add(i * size_of::<usize>())
            .ok_or(SyscallError::Fault)?;
        let arg_ptr: usize = validate::copy_from_user(region, slot)?;
        let bytes = validate::copy_cstr(region, arg_ptr, MAX_ARG_LEN)?;
        argv.push(CString::new(bytes).map_err(|_| SyscallError::InvalidArgument)?);
    }
    Ok(argv)
}

fn copy_commands(region: &UserRegion, ptr: usize) -> Result<Vec<GraphicsCommand>, SyscallError> {
    let mut commands = Vec::new();
    for i in 0..MAX_GRAPHICS_COMMANDS {
        let addr = ptr
            .checked_add(i * size_of::<GraphicsCommand>())
            .ok_or(SyscallError::Fault)?;
        let command: GraphicsCommand = validate::copy_from_user(region, addr)?;
        if command.is_end() {
            return Ok(commands);
        }
        commands.push(command);
    }
    Err(SyscallError::InvalidArgument)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TEST_REGION;

    fn decode(number: usize, args: [usize; 5]) -> Result<Syscall, DecodeError> {
        Syscall::decode(number, args, &TEST_REGION)
    }

    #[test]
    fn unknown_numbers_are_reported() {
        assert_eq!(decode(0, [0; 5]).unwrap_err(), DecodeError::UnknownCall(0));
        assert_eq!(decode(999, [0; 5]).unwrap_err(), DecodeError::UnknownCall(999));
    }

    #[test]
    fn integer_arguments_are_narrowed() {
        match decode(SYS_DRAW_CREATE, [1, 2, 3, 4, (-5i32) as usize]).unwrap() {
            Syscall::DrawCreate { window, x, y, w, h } => {
                assert_eq!((window, x, y, w, h), (1, 2, 3, 4, -5));
            }
            other => panic!("unexpected {:?}", other),
        }
        match decode(SYS_SBRK, [(-8isize) as usize, 0, 0, 0, 0]).unwrap() {
            Syscall::Sbrk { delta } => assert_eq!(delta, -8),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn run_copies_path_and_argv() {
        let path = b"/bin/shell\0";
        let arg0 = b"shell\0";
        let arg1 = b"-v\0";
        let argv = [arg0.as_ptr() as usize, arg1.as_ptr() as usize];

        match decode(SYS_PROCESS_RUN, [path.as_ptr() as usize, argv.as_ptr() as usize, 2, 0, 0])
            .unwrap()
        {
            Syscall::ProcessRun { path, argv } => {
                assert_eq!(path, "/bin/shell");
                assert_eq!(argv.len(), 2);
                assert_eq!(argv[0].as_bytes(), b"shell");
                assert_eq!(argv[1].as_bytes(), b"-v");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn run_rejects_bad_pointers_and_counts() {
        let path = b"/bin/shell\0";
        let p = path.as_ptr() as usize;
        assert_eq!(
            decode(SYS_PROCESS_RUN, [0, 0, 0, 0, 0]).unwrap_err(),
            DecodeError::BadArgument(SyscallError::Fault)
        );
        assert_eq!(
            decode(SYS_PROCESS_RUN, [p, 0, 1, 0, 0]).unwrap_err(),
            DecodeError::BadArgument(SyscallError::Fault)
        );
        assert_eq!(
            decode(SYS_PROCESS_RUN, [p, 0, (-1i32) as usize, 0, 0]).unwrap_err(),
            DecodeError::BadArgument(SyscallError::InvalidArgument)
        );
        assert!(decode(SYS_PROCESS_RUN, [p, 0, 0, 0, 0]).is_ok());
    }

    #[test]
    fn draw_write_stops_at_end_command() {
        let list = [
            GraphicsCommand::new(3, [1, 2, 3, 4]),
            GraphicsCommand::new(5, [0; 4]),
            GraphicsCommand::end(),
            GraphicsCommand::new(9, [9; 4]),
        ];
        match decode(SYS_DRAW_WRITE, [list.as_ptr() as usize, 0, 0, 0, 0]).unwrap() {
            Syscall::DrawWrite { commands } => assert_eq!(commands, list[..2]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn file_calls_take_raw_registers() {
        assert!(matches!(
            decode(SYS_OPEN, [0, 1, 2, 0, 0]).unwrap(),
            Syscall::Open { path: 0, mode: 1, flags: 2 }
        ));
    }
}
