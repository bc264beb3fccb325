//! Time syscalls

use super::error::SysResult;
use crate::kernel::Kernel;

impl Kernel {
    /// sleep(ms) - suspend the caller for at least `ms` milliseconds
    pub(crate) fn sys_sleep(&self, ms: u32) -> SysResult<usize> {
        let clock = &self.services().clock;
        let wake = clock.uptime_ms().saturating_add(u64::from(ms));
        while clock.uptime_ms() < wake {
            self.services().scheduler.yield_now();
        }
        Ok(0)
    }

    /// gettimeofday() -> seconds since the Unix epoch
    ///
    /// Always succeeds. The caller reads the result register as `u32`, so
    /// times from 2038 on look negative in `i32` form.
    pub(crate) fn sys_gettimeofday(&self) -> u32 {
        self.services().rtc.read().to_timestamp()
    }
}
