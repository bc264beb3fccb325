//! System Call Input Validation
//!
//! Every pointer that arrives in a register is checked against the user
//! region before the kernel touches it, and what it points to is copied
//! into kernel memory before use.
//!
//! # Security Principles
//! - Validate ALL pointers before use
//! - Fail-secure: deny by default
//! - Copy in, so a racing user thread cannot change data after the check
//! - Null pointers are always rejected

use alloc::vec::Vec;
use core::marker::PhantomData;
use core::mem::{align_of, size_of};

use super::error::SyscallError;
use crate::config::UserRegion;

/// A validated user-space read buffer
///
/// This type guarantees that:
/// - The buffer is within the user region
/// - The length doesn't overflow
#[derive(Debug)]
pub struct UserBuffer {
    ptr: *const u8,
    len: usize,
}

impl UserBuffer {
    /// Get the buffer as a byte slice
    pub fn as_bytes(&self) -> &[u8] {
        if self.len == 0 {
            return &[];
        }
        // SAFETY:
        // - Pointer and length were checked against the user region
        // - User memory is mapped while the caller is blocked in the trap
        unsafe { core::slice::from_raw_parts(self.ptr, self.len) }
    }
}

/// Validate a user-space read buffer
///
/// # Security Checks
/// 1. Pointer is not null
/// 2. Pointer + length doesn't overflow
/// 3. The whole range is inside the user region
pub fn validate_user_read(
    region: &UserRegion,
    ptr: usize,
    len: usize,
) -> Result<UserBuffer, SyscallError> {
    if len == 0 {
        return Ok(UserBuffer { ptr: ptr as *const u8, len: 0 });
    }

    if ptr == 0 {
        return Err(SyscallError::Fault);
    }

    if !region.contains_range(ptr, len) {
        return Err(SyscallError::Fault);
    }

    Ok(UserBuffer { ptr: ptr as *const u8, len })
}

/// A validated, aligned user pointer the kernel may write one `T` through.
#[derive(Debug)]
pub struct UserPtr<T> {
    addr: usize,
    _marker: PhantomData<*mut T>,
}

impl<T: Copy> UserPtr<T> {
    /// Store `value` in user memory.
    pub fn write(&self, value: T) {
        // SAFETY:
        // - Address is non-null, aligned for T and inside the user region
        //   (checked in validate_user_write)
        unsafe { core::ptr::write_volatile(self.addr as *mut T, value) }
    }

}

/// Validate a user-space location for writing one `T`.
pub fn validate_user_write<T>(region: &UserRegion, ptr: usize) -> Result<UserPtr<T>, SyscallError> {
    validate_user_read(region, ptr, size_of::<T>())?;
    if ptr == 0 || ptr % align_of::<T>() != 0 {
        return Err(SyscallError::Fault);
    }
    Ok(UserPtr { addr: ptr, _marker: PhantomData })
}

/// Read one `T` from user memory.
pub fn copy_from_user<T: Copy>(region: &UserRegion, ptr: usize) -> Result<T, SyscallError> {
    let buf = validate_user_read(region, ptr, size_of::<T>())?;
    if ptr == 0 {
        return Err(SyscallError::Fault);
    }
    // SAFETY: the range is validated; unaligned reads are allowed
    Ok(unsafe { core::ptr::read_unaligned(buf.as_bytes().as_ptr() as *const T) })
}

/// Copy a NUL-terminated string out of user memory.
///
/// Fails with `InvalidArgument` if no terminator is found within `max`
/// bytes. The terminator is not included.
pub fn copy_cstr(region: &UserRegion, ptr: usize, max: usize) -> Result<Vec<u8>, SyscallError> {
    let (bytes, terminated) = scan_cstr(region, ptr, max)?;
    if terminated {
        Ok(bytes)
    } else {
        Err(SyscallError::InvalidArgument)
    }
}

/// Copy a NUL-terminated string of any length.
///
/// Every byte is checked against the user region, so a string that runs
/// off the end of it faults.
pub fn copy_cstr_unbounded(region: &UserRegion, ptr: usize) -> Result<Vec<u8>, SyscallError> {
    scan_cstr(region, ptr, usize::MAX).map(|(bytes, _)| bytes)
}

fn scan_cstr(region: &UserRegion, ptr: usize, max: usize) -> Result<(Vec<u8>, bool), SyscallError> {
    if ptr == 0 {
        return Err(SyscallError::Fault);
    }
    let mut bytes = Vec::new();
    for i in 0..max {
        let addr = ptr.checked_add(i).ok_or(SyscallError::Fault)?;
        let byte: u8 = copy_from_user(region, addr)?;
        if byte == 0 {
            return Ok((bytes, true));
        }
        bytes.push(byte);
    }
    Ok((bytes, false))
}
