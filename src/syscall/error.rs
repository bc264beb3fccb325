//! System call error codes
//!
//! Errors reach user space as negative return values. `-1` is reserved for
//! call numbers the dispatcher does not know, and no handler ever returns
//! it, so a caller can always tell "no such call" from a handler failure.

use core::fmt;

use crate::mm::{GrowError, MappingError};

/// System call error codes
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallError {
    /// Call number not recognised (dispatcher only)
    UnknownCall = -1,
    /// No such file, process, child or window
    NoEntry = -2,
    /// Caller has no children to wait for
    NoChild = -10,
    /// Nothing available right now
    WouldBlock = -11,
    /// Out of memory or past the heap limit
    OutOfMemory = -12,
    /// Bad address (invalid pointer)
    Fault = -14,
    /// Invalid argument
    InvalidArgument = -22,
    /// Call exists but is not implemented
    NotImplemented = -38,
    /// Result does not fit in the return register
    Overflow = -75,
    /// Timeout expired
    TimedOut = -110,
}

/// Value returned for an unknown call number.
pub const UNKNOWN_CALL: i32 = SyscallError::UnknownCall as i32;

/// Result of a system call handler.
pub type SysResult<T> = Result<T, SyscallError>;

impl SyscallError {
    /// The raw value placed in the return register.
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Recover an error from a raw return value.
    pub const fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            -1 => Self::UnknownCall,
            -2 => Self::NoEntry,
            -10 => Self::NoChild,
            -11 => Self::WouldBlock,
            -12 => Self::OutOfMemory,
            -14 => Self::Fault,
            -22 => Self::InvalidArgument,
            -38 => Self::NotImplemented,
            -75 => Self::Overflow,
            -110 => Self::TimedOut,
            _ => return None,
        })
    }
}

impl fmt::Display for SyscallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::UnknownCall => "unknown system call",
            Self::NoEntry => "no such entry",
            Self::NoChild => "no child processes",
            Self::WouldBlock => "resource temporarily unavailable",
            Self::OutOfMemory => "out of memory",
            Self::Fault => "bad address",
            Self::InvalidArgument => "invalid argument",
            Self::NotImplemented => "not implemented",
            Self::Overflow => "value too large",
            Self::TimedOut => "timed out",
        };
        f.write_str(msg)
    }
}

impl From<MappingError> for SyscallError {
    fn from(e: MappingError) -> Self {
        match e {
            MappingError::OutOfMemory => Self::OutOfMemory,
            _ => Self::InvalidArgument,
        }
    }
}

impl From<GrowError> for SyscallError {
    fn from(e: GrowError) -> Self {
        match e {
            GrowError::LimitExceeded => Self::OutOfMemory,
            GrowError::Mapping(e) => e.into(),
        }
    }
}

/// Pack a handler result into the return register.
pub fn encode(result: SysResult<usize>) -> i32 {
    match result {
        Ok(value) => i32::try_from(value).unwrap_or(SyscallError::Overflow.code()),
        Err(e) => e.code(),
    }
}
