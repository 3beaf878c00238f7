/// A source of wall-clock time in **unix milliseconds**.
///
/// Allocators read the clock once per identifier and subtract
/// [`EPOCH`](crate::EPOCH) themselves, so implementations report absolute
/// time. This abstraction lets you plug in the system clock, a monotonic
/// ticker, or a mocked time source in tests.
///
/// # Example
///
/// ```
/// use sleet::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_700_000_000_000
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1_700_000_000_000);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since 1970-01-01 UTC.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
