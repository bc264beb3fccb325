//! Console and keyboard syscalls

use super::error::{SysResult, SyscallError};
use crate::kernel::Kernel;

impl Kernel {
    /// debug(text) - copy a string to the kernel console
    ///
    /// The whole string is written in one console call.
    pub(crate) fn sys_debug(&self, text: &[u8]) -> SysResult<usize> {
        self.services().console.write(text);
        Ok(0)
    }

    /// keyboard_read_char() -> next key code
    pub(crate) fn sys_keyboard_read_char(&self) -> SysResult<usize> {
        self.services()
            .keyboard
            .read()
            .map(|code| code as usize)
            .ok_or(SyscallError::WouldBlock)
    }
}
