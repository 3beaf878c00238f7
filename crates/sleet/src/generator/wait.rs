use core::time::Duration;

use crate::TimeSource;

/// How an allocator waits for the clock to tick once all 1024 sequence
/// values of the current millisecond are used.
///
/// Every strategy keeps re-reading the clock until it reports a time past
/// the last issuance, so ordering and uniqueness are the same for all of
/// them. They only differ in CPU usage and wake-up latency. The wait cannot
/// be cancelled and has no timeout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WaitStrategy {
    /// Busy-poll the clock with a [`spin_loop`](core::hint::spin_loop) hint.
    /// Lowest latency, burns a core while waiting.
    #[default]
    Spin,
    /// Yield the thread to the scheduler between polls.
    Yield,
    /// Sleep for the given duration between polls.
    Sleep(Duration),
}

impl WaitStrategy {
    /// Blocks until `time` reports a value strictly greater than `last`, and
    /// returns that value.
    pub fn wait_past<T>(self, last: u64, time: &T) -> u64
    where
        T: TimeSource + ?Sized,
    {
        loop {
            let now = time.current_millis();
            if now > last {
                return now;
            }
            match self {
                Self::Spin => core::hint::spin_loop(),
                Self::Yield => std::thread::yield_now(),
                Self::Sleep(pause) => std::thread::sleep(pause),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct Countdown {
        reads: Cell<u64>,
        stall_for: u64,
    }

    impl TimeSource for Countdown {
        fn current_millis(&self) -> u64 {
            let reads = self.reads.get() + 1;
            self.reads.set(reads);
            if reads > self.stall_for { 11 } else { 10 }
        }
    }

    #[test]
    fn every_strategy_returns_first_later_reading() {
        for strategy in [
            WaitStrategy::Spin,
            WaitStrategy::Yield,
            WaitStrategy::Sleep(Duration::from_micros(10)),
        ] {
            let clock = Countdown {
                reads: Cell::new(0),
                stall_for: 5,
            };
            assert_eq!(strategy.wait_past(10, &clock), 11);
            assert_eq!(clock.reads.get(), 6);
        }
    }

    #[test]
    fn returns_immediately_when_clock_already_ahead() {
        let clock = Countdown {
            reads: Cell::new(0),
            stall_for: 0,
        };
        assert_eq!(WaitStrategy::Spin.wait_past(10, &clock), 11);
        assert_eq!(clock.reads.get(), 1);
    }
}
