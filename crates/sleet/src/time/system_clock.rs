use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// The operating system's wall clock.
///
/// This clock follows every adjustment made to the system time, including
/// backward corrections. Allocators detect those and fail with
/// [`Error::ClockRegression`](crate::Error::ClockRegression) rather than risk
/// reissuing an identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    /// Returns `0` if the system time is set before 1970, which allocators
    /// then reject as predating the epoch.
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |since| since.as_millis() as u64)
    }
}
