use core::time::Duration;
use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    thread::{self, JoinHandle},
    time::Instant,
};

use crate::{SystemClock, TimeSource};

#[derive(Debug)]
struct Ticker {
    elapsed_ms: AtomicU64,
    _handle: OnceLock<JoinHandle<()>>,
}

/// A clock that never moves backwards.
///
/// The wall-clock time is sampled once at construction. From then on a
/// background thread advances a shared millisecond counter using
/// [`Instant`], so later adjustments to the system clock (NTP steps, manual
/// changes) are not observed and an allocator driven by this clock never
/// reports [`Error::ClockRegression`](crate::Error::ClockRegression).
///
/// The trade-off is drift: over long uptimes the reported time can diverge
/// from the system clock by however much the system clock was corrected.
///
/// Clones share the same ticker thread. The thread exits once the last clone
/// is dropped.
///
/// # Example
///
/// ```
/// use sleet::{MonotonicClock, TimeSource};
///
/// let clock = MonotonicClock::new();
/// let a = clock.current_millis();
/// std::thread::sleep(std::time::Duration::from_millis(3));
/// assert!(clock.current_millis() >= a);
/// ```
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    ticker: Arc<Ticker>,
    origin_ms: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Anchors a new clock to the current system time.
    pub fn new() -> Self {
        Self::with_origin(SystemClock.current_millis())
    }

    /// Anchors a new clock so that it reads `origin_ms` (unix milliseconds)
    /// right now.
    pub fn with_origin(origin_ms: u64) -> Self {
        let start = Instant::now();
        let ticker = Arc::new(Ticker {
            elapsed_ms: AtomicU64::new(0),
            _handle: OnceLock::new(),
        });

        let weak = Arc::downgrade(&ticker);
        let handle = thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(ticker) = weak.upgrade() else {
                    break;
                };

                // Absolute target of the next tick, so sleep overshoot does
                // not accumulate.
                let target = start + Duration::from_millis(tick);
                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let elapsed = start.elapsed().as_millis() as u64;
                ticker.elapsed_ms.store(elapsed, Ordering::Release);
                tick = elapsed + 1;
            }
        });

        // Freshly created cell; setting it cannot fail.
        let _ = ticker._handle.set(handle);

        Self { ticker, origin_ms }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.origin_ms + self.ticker.elapsed_ms.load(Ordering::Acquire)
    }
}
