//! Window drawing syscalls

use super::error::{SysResult, SyscallError, UNKNOWN_CALL};
use crate::kernel::Kernel;
use crate::window::GraphicsCommand;

impl Kernel {
    /// draw_create(window, x, y, w, h) -> new window index
    ///
    /// Creates a child of one of the caller's windows. The requested
    /// rectangle is relative to the parent and must fit inside it.
    pub(crate) fn sys_draw_create(&self, window: i32, x: i32, y: i32, w: i32, h: i32) -> SysResult<usize> {
        let pid = self.current();
        let mut procs = self.procs.lock();
        let process = procs.get_live_mut(pid).ok_or(SyscallError::NoEntry)?;
        let windows = process.windows_mut();

        if windows.is_full() {
            log::debug!("[WINDOW] {} window table full", pid);
            return Err(SyscallError::NoEntry);
        }

        let parent = usize::try_from(window)
            .ok()
            .and_then(|index| windows.get(index))
            .ok_or(SyscallError::NoEntry)?;

        let clip = parent.clip().sub_rect(x, y, w, h).ok_or_else(|| {
            log::debug!(
                "[WINDOW] ({}, {}, {}, {}) does not fit in {:?}",
                x, y, w, h, parent.clip()
            );
            SyscallError::NoEntry
        })?;

        let child = parent.create_child(clip).ok_or(SyscallError::NoEntry)?;
        let index = windows.push(child).map_err(|_| SyscallError::NoEntry)?;
        Ok(index)
    }

    /// draw_write(commands) - hand a command list to the compositor
    ///
    /// The compositor's result is returned as is, except that `-1` becomes
    /// `InvalidArgument` so it cannot be mistaken for [`UNKNOWN_CALL`].
    pub(crate) fn sys_draw_write(&self, commands: &[GraphicsCommand]) -> i32 {
        let pid = self.current();
        let procs = self.procs.lock();
        let Some(process) = procs.get(pid) else {
            return SyscallError::NoEntry.code();
        };
        match self.services().compositor.write(process.windows(), commands) {
            UNKNOWN_CALL => {
                log::debug!("[WINDOW] {} compositor rejected command list", pid);
                SyscallError::InvalidArgument.code()
            }
            ret => ret,
        }
    }
}
