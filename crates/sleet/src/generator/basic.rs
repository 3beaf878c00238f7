use core::cell::Cell;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Result, SleetId, SystemClock, TimeSource,
    generator::{
        IdGenerator, WaitStrategy, WorkerBuilder, WorkerConfig, WorkerIdentity, WorkerState,
        check_count,
    },
};

/// A single-threaded allocator.
///
/// The state lives in a [`Cell`], so the allocator is `Send` but not `Sync`.
/// Use it when one thread owns the allocator and you want the cheapest
/// possible issuance.
///
/// ## See Also
/// - [`LockIdWorker`]
///
/// [`LockIdWorker`]: crate::LockIdWorker
///
/// # Example
///
/// ```
/// use sleet::BasicIdWorker;
///
/// let worker = BasicIdWorker::new(3).unwrap();
/// let a = worker.next_id().unwrap();
/// let b = worker.next_id().unwrap();
/// assert!(a < b);
/// ```
#[derive(Debug)]
pub struct BasicIdWorker<T = SystemClock>
where
    T: TimeSource,
{
    state: Cell<WorkerState>,
    identity: WorkerIdentity,
    time: T,
    wait: WaitStrategy,
}

impl BasicIdWorker<SystemClock> {
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

impl<T> BasicIdWorker<T>
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
        let mut state = self.state.get();
        let id = state.next(self.identity, &self.time, self.wait)?;
        self.state.set(state);
        Ok(id)
    }

    /// Issues a batch of identifiers. See [`IdGenerator::next_ids`].
    ///
    /// # Errors
    ///
    /// See [`IdGenerator::next_ids`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_ids(&self, count: usize) -> Result<Vec<SleetId>> {
        check_count(count)?;
        let mut state = self.state.get();
        let ids = state.next_batch(count, self.identity, &self.time, self.wait);
        self.state.set(state);
        ids
    }

    pub fn state(&self) -> WorkerState {
        self.state.get()
    }
}

impl<T> IdGenerator<T> for BasicIdWorker<T>
where
    T: TimeSource,
{
    fn from_config(config: WorkerConfig<T>) -> Self {
        Self {
            state: Cell::new(WorkerState::new()),
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
        Ok(self.state())
    }
}
