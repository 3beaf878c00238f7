use crate::{
    Error, Result, SystemClock, TimeSource,
    generator::{IdGenerator, WaitStrategy},
    id::{DEFAULT_REGION_ID, MAX_NODE_ID, MAX_REGION_ID},
};

/// The validated region and node an allocator stamps into every identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorkerIdentity {
    region_id: u8,
    node_id: u16,
}

impl WorkerIdentity {
    /// Validates both ids against their field widths.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidNodeId`] if `node_id > 511`
    /// - [`Error::InvalidRegionId`] if `region_id > 31`
    pub const fn new(node_id: u16, region_id: u8) -> Result<Self> {
        if node_id > MAX_NODE_ID {
            return Err(Error::invalid_node_id(node_id));
        }
        if region_id > MAX_REGION_ID {
            return Err(Error::invalid_region_id(region_id));
        }
        Ok(Self { region_id, node_id })
    }

    /// The node id.
    pub const fn node_id(&self) -> u16 {
        self.node_id
    }

    /// The region id.
    pub const fn region_id(&self) -> u8 {
        self.region_id
    }
}

/// Everything an allocator needs, already validated by [`WorkerBuilder`].
#[derive(Clone, Debug)]
pub struct WorkerConfig<T> {
    pub(crate) identity: WorkerIdentity,
    pub(crate) time: T,
    pub(crate) wait: WaitStrategy,
}

impl<T> WorkerConfig<T> {
    /// The validated identity.
    pub const fn identity(&self) -> WorkerIdentity {
        self.identity
    }

    /// The configured wait strategy.
    pub const fn wait_strategy(&self) -> WaitStrategy {
        self.wait
    }
}

/// Configures and validates an allocator.
///
/// Only the node id is required. The region id defaults to
/// [`DEFAULT_REGION_ID`], the clock to [`SystemClock`], and the wait strategy
/// to [`WaitStrategy::Spin`].
///
/// # Examples
///
/// ```
/// use sleet::{IdGenerator, LockIdWorker, WaitStrategy, WorkerBuilder};
///
/// let worker: LockIdWorker = WorkerBuilder::new(42)
///     .region_id(3)
///     .wait_strategy(WaitStrategy::Yield)
///     .build()
///     .unwrap();
///
/// let id = worker.next_id().unwrap();
/// assert_eq!(id.node_id(), 42);
/// assert_eq!(id.region_id(), 3);
/// ```
///
/// Out-of-range ids are rejected:
///
/// ```
/// use sleet::{Error, LockIdWorker, WorkerBuilder};
///
/// let err = WorkerBuilder::new(512).build::<LockIdWorker>().unwrap_err();
/// assert!(matches!(err, Error::InvalidNodeId { node_id: 512, .. }));
/// ```
#[derive(Clone, Debug)]
pub struct WorkerBuilder<T = SystemClock> {
    node_id: u16,
    region_id: u8,
    time: T,
    wait: WaitStrategy,
}

impl WorkerBuilder<SystemClock> {
    /// Starts a builder for the given node id.
    pub const fn new(node_id: u16) -> Self {
        Self {
            node_id,
            region_id: DEFAULT_REGION_ID,
            time: SystemClock,
            wait: WaitStrategy::Spin,
        }
    }
}

impl<T> WorkerBuilder<T>
where
    T: TimeSource,
{
    /// Sets the region id.
    #[must_use]
    pub fn region_id(mut self, region_id: u8) -> Self {
        self.region_id = region_id;
        self
    }

    /// Sets the wait strategy used when a millisecond's sequence is used up.
    #[must_use]
    pub fn wait_strategy(mut self, wait: WaitStrategy) -> Self {
        self.wait = wait;
        self
    }

    /// Replaces the clock.
    pub fn clock<U>(self, time: U) -> WorkerBuilder<U>
    where
        U: TimeSource,
    {
        WorkerBuilder {
            node_id: self.node_id,
            region_id: self.region_id,
            time,
            wait: self.wait,
        }
    }

    /// Validates the ids and returns the finished configuration.
    ///
    /// # Errors
    ///
    /// See [`WorkerIdentity::new`].
    pub fn into_config(self) -> Result<WorkerConfig<T>> {
        let identity = WorkerIdentity::new(self.node_id, self.region_id)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            node_id = identity.node_id(),
            region_id = identity.region_id(),
            wait = ?self.wait,
            "allocator configured"
        );
        Ok(WorkerConfig {
            identity,
            time: self.time,
            wait: self.wait,
        })
    }

    /// Validates the ids and constructs the allocator.
    ///
    /// # Errors
    ///
    /// See [`WorkerIdentity::new`].
    pub fn build<G>(self) -> Result<G>
    where
        G: IdGenerator<T>,
    {
        self.into_config().map(G::from_config)
    }
}
