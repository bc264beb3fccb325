//! sbrk - heap growth
//!
//! Grows the caller's heap by mapping fresh pages under the new break only
//! where nothing is mapped yet. Shrinking is not supported.

use super::error::{SysResult, SyscallError};
use crate::kernel::Kernel;

impl Kernel {
    /// sbrk(delta) -> previous break
    pub(crate) fn sys_sbrk(&self, delta: isize) -> SysResult<usize> {
        let delta = usize::try_from(delta).map_err(|_| {
            log::debug!("[BRK] negative delta {} refused", delta);
            SyscallError::InvalidArgument
        })?;

        let pid = self.current();
        let limit = self.config().user_heap_limit;
        let mut procs = self.procs.lock();
        let process = procs.get_live_mut(pid).ok_or(SyscallError::NoEntry)?;

        let old = process.grow_heap(delta, limit).map_err(|e| {
            log::debug!("[BRK] {} could not grow by {}: {:?}", pid, delta, e);
            SyscallError::from(e)
        })?;
        Ok(old.as_usize())
    }
}
