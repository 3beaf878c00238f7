use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Result, SleetId, SystemClock, TimeSource,
    generator::{
        IdGenerator, Mutex, MutexGuard, WaitStrategy, WorkerBuilder, WorkerConfig,
        WorkerIdentity, WorkerState, check_count,
    },
};

/// A lock-based allocator that can be shared across threads.
///
/// The state sits behind an [`Arc<Mutex<_>>`]. Every issuance, clock read
/// included, happens while the lock is held, so concurrent callers observe
/// one total order and a batch is never interleaved with other calls.
///
/// Clones share the same state and therefore the same sequence space.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Batches are contiguous
///
/// ## See Also
/// - [`BasicIdWorker`]
///
/// [`BasicIdWorker`]: crate::BasicIdWorker
///
/// # Example
///
/// ```
/// use std::thread;
/// use sleet::LockIdWorker;
///
/// let worker = LockIdWorker::new(1).unwrap();
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let worker = worker.clone();
///         thread::spawn(move || worker.next_ids(10).unwrap())
///     })
///     .collect();
///
/// let mut ids: Vec<_> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
/// ids.sort();
/// ids.dedup();
/// assert_eq!(ids.len(), 40);
/// ```
#[derive(Debug)]
pub struct LockIdWorker<T = SystemClock>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    pub(crate) state: Arc<crossbeam_utils::CachePadded<Mutex<WorkerState>>>,
    #[cfg(not(feature = "cache-padded"))]
    pub(crate) state: Arc<Mutex<WorkerState>>,
    identity: WorkerIdentity,
    time: T,
    wait: WaitStrategy,
}

impl<T> Clone for LockIdWorker<T>
where
    T: TimeSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            identity: self.identity,
            time: self.time.clone(),
            wait: self.wait,
        }
    }
}

impl LockIdWorker<SystemClock> {
    /// Creates an allocator for `node_id` in the default region, reading the
    /// system clock.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNodeId`](crate::Error::InvalidNodeId) if
    /// `node_id > 511`.
    pub fn new(node_id: u16) -> Result<Self> {
        WorkerBuilder::new(node_id).build()
    }
}

impl<T> LockIdWorker<T>
where
    T: TimeSource,
{
    /// Creates an allocator for `node_id` reading the given clock.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNodeId`](crate::Error::InvalidNodeId) if
    /// `node_id > 511`.
    pub fn with_clock(node_id: u16, time: T) -> Result<Self> {
        WorkerBuilder::new(node_id).clock(time).build()
    }

    pub const fn node_id(&self) -> u16 {
        self.identity.node_id()
    }

    pub const fn region_id(&self) -> u8 {
        self.identity.region_id()
    }

    /// Issues one identifier. See [`IdGenerator::next_id`].
    ///
    /// # Errors
    ///
    /// See [`IdGenerator::next_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SleetId> {
        let mut state = self.lock()?;
        state.next(self.identity, &self.time, self.wait)
    }

    /// Issues a batch of identifiers under a single acquisition of the lock.
    /// See [`IdGenerator::next_ids`].
    ///
    /// # Errors
    ///
    /// See [`IdGenerator::next_ids`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_ids(&self, count: usize) -> Result<Vec<SleetId>> {
        check_count(count)?;
        let mut state = self.lock()?;
        state.next_batch(count, self.identity, &self.time, self.wait)
    }

    /// Snapshot of the shared state.
    ///
    /// # Errors
    ///
    /// Fails if the lock is poisoned.
    pub fn state(&self) -> Result<WorkerState> {
        Ok(*self.lock()?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, WorkerState>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }
}

impl<T> IdGenerator<T> for LockIdWorker<T>
where
    T: TimeSource,
{
    fn from_config(config: WorkerConfig<T>) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(
                WorkerState::new(),
            ))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(WorkerState::new())),
            identity: config.identity,
            time: config.time,
            wait: config.wait,
        }
    }

    fn node_id(&self) -> u16 {
        self.node_id()
    }

    fn region_id(&self) -> u8 {
        self.region_id()
    }

    fn next_id(&self) -> Result<SleetId> {
        self.next_id()
    }

    fn next_ids(&self, count: usize) -> Result<Vec<SleetId>> {
        self.next_ids(count)
    }

    fn state(&self) -> Result<WorkerState> {
        self.state()
    }
}
