use crate::id::{MAX_NODE_ID, MAX_REGION_ID};

/// A result type defaulting to the allocator [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors an allocator can report.
///
/// Every variant is returned to the immediate caller. Nothing is retried
/// internally, and no error is ever converted into an identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The node id does not fit the 9-bit node field.
    #[error("node id {node_id} must be between 0 and {max}")]
    InvalidNodeId {
        /// The rejected node id.
        node_id: u16,
        /// The largest accepted node id.
        max: u16,
    },

    /// The region id does not fit the 5-bit region field.
    #[error("region id {region_id} must be between 0 and {max}")]
    InvalidRegionId {
        /// The rejected region id.
        region_id: u8,
        /// The largest accepted region id.
        max: u8,
    },

    /// A batch request asked for more identifiers than a single call may
    /// produce.
    #[error("batch of {count} ids exceeds the limit of {max}")]
    InvalidCount {
        /// The requested batch size.
        count: usize,
        /// The largest accepted batch size.
        max: usize,
    },

    /// The clock reported a time earlier than the last issuance.
    ///
    /// The allocator state is left untouched when this is returned.
    #[error("clock moved backwards, refusing to generate ids for {behind_by_ms} milliseconds")]
    ClockRegression {
        /// Size of the backward jump in milliseconds.
        behind_by_ms: u64,
    },

    /// The clock reading cannot be encoded in the 39-bit time field, either
    /// because it predates [`EPOCH`](crate::EPOCH) or because the field is
    /// exhausted.
    #[error("timestamp {unix_millis} ms is outside the encodable time window")]
    TimestampOutOfRange {
        /// The offending wall-clock reading in unix milliseconds.
        unix_millis: u64,
    },

    /// The allocator lock was poisoned by a panicking thread.
    ///
    /// Not available with `parking-lot`, whose mutexes do not poison.
    #[cfg_attr(docsrs, doc(cfg(all(feature = "lock", not(feature = "parking-lot")))))]
    #[cfg(all(feature = "lock", not(feature = "parking-lot")))]
    #[error("allocator lock poisoned")]
    LockPoisoned,
}

impl Error {
    pub(crate) const fn invalid_node_id(node_id: u16) -> Self {
        Self::InvalidNodeId {
            node_id,
            max: MAX_NODE_ID,
        }
    }

    pub(crate) const fn invalid_region_id(region_id: u8) -> Self {
        Self::InvalidRegionId {
            region_id,
            max: MAX_REGION_ID,
        }
    }
}

#[cfg(all(feature = "lock", not(feature = "parking-lot")))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(all(feature = "lock", not(feature = "parking-lot")))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}

/// Errors produced while decoding an identifier from one of its presentation
/// forms.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The input has a length no valid encoding can have.
    #[error("invalid length: {len}")]
    InvalidLength {
        /// Length of the rejected input.
        len: usize,
    },

    /// The input contains a byte outside the expected alphabet.
    #[error("invalid byte {byte:#04x} at index {index}")]
    InvalidByte {
        /// The offending byte.
        byte: u8,
        /// Position of the offending byte.
        index: usize,
    },

    /// The decimal digits do not form a `u64`.
    #[error("invalid decimal digits")]
    InvalidDigits,

    /// The decoded value sets the reserved sign bit.
    #[error("reserved bit set in {raw:#018x}")]
    ReservedBitSet {
        /// The raw decoded value.
        raw: u64,
    },
}
