use core::cmp::Ordering;

use crate::{
    Error, Result, SleetId, TimeSource,
    generator::{WaitStrategy, WorkerIdentity},
    id::{MAX_SEQUENCE, elapsed_since_epoch},
};

/// Largest number of identifiers a single batch call may produce.
pub const MAX_BATCH_SIZE: usize = 100;

/// Mutable allocation state of one node.
///
/// A fresh state has never issued anything. After each successful issuance
/// it holds the wall-clock millisecond (unix time) and sequence of the last
/// identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WorkerState {
    /// Unix milliseconds of the last issuance, `None` before the first one.
    pub last_timestamp: Option<u64>,
    /// Sequence of the last issuance within `last_timestamp`.
    pub sequence: u16,
}

impl WorkerState {
    /// State of an allocator that has not issued anything yet.
    pub const fn new() -> Self {
        Self {
            last_timestamp: None,
            sequence: 0,
        }
    }

    /// Issues one identifier.
    ///
    /// The state is only written once the identifier is known to be valid,
    /// so every error leaves it untouched.
    pub(crate) fn next<T>(
        &mut self,
        identity: WorkerIdentity,
        time: &T,
        wait: WaitStrategy,
    ) -> Result<SleetId>
    where
        T: TimeSource + ?Sized,
    {
        let mut now = time.current_millis();
        let mut sequence = 0;

        if let Some(last) = self.last_timestamp {
            match now.cmp(&last) {
                Ordering::Less => return Err(Self::cold_clock_behind(now, last)),
                Ordering::Equal => {
                    sequence = (self.sequence + 1) & MAX_SEQUENCE;
                    if sequence == 0 {
                        now = Self::cold_wait_next_millis(last, time, wait);
                    }
                }
                Ordering::Greater => {}
            }
        }

        let elapsed =
            elapsed_since_epoch(now).ok_or(Error::TimestampOutOfRange { unix_millis: now })?;

        self.last_timestamp = Some(now);
        self.sequence = sequence;

        Ok(SleetId::from_components(
            elapsed,
            identity.region_id(),
            identity.node_id(),
            sequence,
        ))
    }

    /// Issues `count` identifiers back to back.
    ///
    /// On error the identifiers already produced are dropped. The state keeps
    /// the progress they made, so none of them can be issued again.
    pub(crate) fn next_batch<T>(
        &mut self,
        count: usize,
        identity: WorkerIdentity,
        time: &T,
        wait: WaitStrategy,
    ) -> Result<Vec<SleetId>>
    where
        T: TimeSource + ?Sized,
    {
        (0..count)
            .map(|_| self.next(identity, time, wait))
            .collect()
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, last: u64) -> Error {
        let behind_by_ms = last - now;
        #[cfg(feature = "tracing")]
        tracing::warn!(behind_by_ms, last, now, "clock moved backwards");
        Error::ClockRegression { behind_by_ms }
    }

    #[cold]
    #[inline(never)]
    fn cold_wait_next_millis<T>(last: u64, time: &T, wait: WaitStrategy) -> u64
    where
        T: TimeSource + ?Sized,
    {
        #[cfg(feature = "tracing")]
        tracing::debug!(last, ?wait, "sequence exhausted, waiting for next millisecond");
        wait.wait_past(last, time)
    }
}

/// Rejects batch sizes above [`MAX_BATCH_SIZE`].
pub(crate) const fn check_count(count: usize) -> Result<()> {
    if count > MAX_BATCH_SIZE {
        return Err(Error::InvalidCount {
            count,
            max: MAX_BATCH_SIZE,
        });
    }
    Ok(())
}
