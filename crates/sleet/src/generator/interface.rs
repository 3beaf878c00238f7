use crate::{
    Result, SleetId, TimeSource,
    generator::{WorkerBuilder, WorkerConfig, WorkerState},
};

/// The allocator interface shared by [`BasicIdWorker`] and
/// [`LockIdWorker`].
///
/// [`BasicIdWorker`]: crate::BasicIdWorker
/// [`LockIdWorker`]: crate::LockIdWorker
pub trait IdGenerator<T>: Sized
where
    T: TimeSource,
{
    /// Builds the allocator from a validated configuration.
    fn from_config(config: WorkerConfig<T>) -> Self;

    /// Validates `node_id` and builds an allocator reading `time`, with the
    /// default region id and wait strategy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNodeId`] if `node_id > 511`.
    ///
    /// [`Error::InvalidNodeId`]: crate::Error::InvalidNodeId
    fn try_new(node_id: u16, time: T) -> Result<Self> {
        WorkerBuilder::new(node_id).clock(time).build()
    }

    /// The node id stamped into every identifier.
    fn node_id(&self) -> u16;

    /// The region id stamped into every identifier.
    fn region_id(&self) -> u8;

    /// Issues exactly one fresh identifier.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock reads earlier than the last
    ///   issuance
    /// - [`Error::TimestampOutOfRange`] if the clock cannot be encoded
    /// - [`Error::LockPoisoned`] for a poisoned std mutex
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    /// [`Error::TimestampOutOfRange`]: crate::Error::TimestampOutOfRange
    /// [`Error::LockPoisoned`]: crate::Error
    fn next_id(&self) -> Result<SleetId>;

    /// Issues `count` identifiers in one exclusive section, in increasing
    /// order. No other call on the same allocator interleaves with the batch.
    ///
    /// Either all `count` identifiers are returned or none are.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCount`] if `count` exceeds [`MAX_BATCH_SIZE`], plus
    /// every error of [`Self::next_id`].
    ///
    /// [`Error::InvalidCount`]: crate::Error::InvalidCount
    /// [`MAX_BATCH_SIZE`]: crate::MAX_BATCH_SIZE
    fn next_ids(&self, count: usize) -> Result<Vec<SleetId>>;

    /// Snapshot of the allocation state.
    ///
    /// # Errors
    ///
    /// May fail if the underlying lock is poisoned.
    fn state(&self) -> Result<WorkerState>;
}
