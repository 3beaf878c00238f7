//! The fixed 64-bit layout and the pure functions that pack and unpack it.
//!
//! ```text
//!  Bit Index:  63           63 62            24 23          19 18        10 9             0
//!              +--------------+----------------+--------------+------------+---------------+
//!  Field:      | reserved (1) | timestamp (39) |  region (5)  |  node (9)  | sequence (10) |
//!              +--------------+----------------+--------------+------------+---------------+
//!              |<------------ MSB ---------------- 64 bits ---------------- LSB ---------->|
//! ```
//!
//! The timestamp field holds milliseconds elapsed since [`EPOCH`]. None of
//! these values may change without invalidating every identifier already
//! issued.

use core::time::Duration;

/// Reference point subtracted from every generation time: Friday, November
/// 23, 2018 03:36:00 UTC.
pub const EPOCH: Duration = Duration::from_millis(EPOCH_MILLIS);

/// [`EPOCH`] as unix milliseconds.
pub const EPOCH_MILLIS: u64 = 1_542_944_160_000;

/// Width of the elapsed-time field.
pub const TIMESTAMP_BITS: u32 = 39;
/// Width of the region-id field.
pub const REGION_ID_BITS: u32 = 5;
/// Width of the node-id field.
pub const NODE_ID_BITS: u32 = 9;
/// Width of the sequence field.
pub const SEQUENCE_BITS: u32 = 10;

const _: () = assert!(TIMESTAMP_BITS + REGION_ID_BITS + NODE_ID_BITS + SEQUENCE_BITS == 63);

/// Number of bits to shift the node id to its position (bit 10).
pub const NODE_ID_SHIFT: u32 = SEQUENCE_BITS;
/// Number of bits to shift the region id to its position (bit 19).
pub const REGION_ID_SHIFT: u32 = SEQUENCE_BITS + NODE_ID_BITS;
/// Number of bits to shift the timestamp to its position (bit 24).
pub const TIMESTAMP_SHIFT: u32 = SEQUENCE_BITS + NODE_ID_BITS + REGION_ID_BITS;

/// Bitmask for the 39-bit timestamp field, before shifting.
pub const TIMESTAMP_MASK: u64 = (1 << TIMESTAMP_BITS) - 1;
/// Bitmask for the 5-bit region field, before shifting.
pub const REGION_ID_MASK: u64 = (1 << REGION_ID_BITS) - 1;
/// Bitmask for the 9-bit node field, before shifting.
pub const NODE_ID_MASK: u64 = (1 << NODE_ID_BITS) - 1;
/// Bitmask for the 10-bit sequence field.
pub const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;
/// The always-zero sign bit.
pub const RESERVED_MASK: u64 = 1 << 63;

/// Largest node id, `2^9 - 1`.
pub const MAX_NODE_ID: u16 = NODE_ID_MASK as u16;
/// Largest region id, `2^5 - 1`.
pub const MAX_REGION_ID: u8 = REGION_ID_MASK as u8;
/// Largest sequence value within one millisecond, `2^10 - 1`.
pub const MAX_SEQUENCE: u16 = SEQUENCE_MASK as u16;
/// Number of identifiers one node can issue per millisecond.
pub const SEQUENCES_PER_MILLI: u32 = 1 << SEQUENCE_BITS;
/// Largest elapsed time the timestamp field can hold, in milliseconds.
pub const MAX_TIMESTAMP: u64 = TIMESTAMP_MASK;

/// Region id assigned when none is configured. Identifiers issued before the
/// region became configurable all carry this value.
pub const DEFAULT_REGION_ID: u8 = 1;

/// Packs the four fields into a raw identifier.
///
/// Each field is masked to its width, so out-of-range inputs cannot spill
/// into neighbouring fields or the reserved bit.
#[inline]
pub const fn pack(elapsed_ms: u64, region_id: u8, node_id: u16, sequence: u16) -> u64 {
    ((elapsed_ms & TIMESTAMP_MASK) << TIMESTAMP_SHIFT)
        | ((region_id as u64 & REGION_ID_MASK) << REGION_ID_SHIFT)
        | ((node_id as u64 & NODE_ID_MASK) << NODE_ID_SHIFT)
        | (sequence as u64 & SEQUENCE_MASK)
}

/// Extracts the elapsed milliseconds since [`EPOCH`].
#[inline]
pub const fn timestamp_of(raw: u64) -> u64 {
    (raw >> TIMESTAMP_SHIFT) & TIMESTAMP_MASK
}

/// Extracts the region id.
#[inline]
pub const fn region_id_of(raw: u64) -> u8 {
    ((raw >> REGION_ID_SHIFT) & REGION_ID_MASK) as u8
}

/// Extracts the node id.
#[inline]
pub const fn node_id_of(raw: u64) -> u16 {
    ((raw >> NODE_ID_SHIFT) & NODE_ID_MASK) as u16
}

/// Extracts the sequence.
#[inline]
pub const fn sequence_of(raw: u64) -> u16 {
    (raw & SEQUENCE_MASK) as u16
}

/// Converts the elapsed-time field back to unix milliseconds.
#[inline]
pub const fn unix_millis_of(raw: u64) -> u64 {
    timestamp_of(raw) + EPOCH_MILLIS
}

/// Converts unix milliseconds into the elapsed-time field, or `None` if the
/// reading predates [`EPOCH`] or overflows the field.
#[inline]
pub const fn elapsed_since_epoch(unix_millis: u64) -> Option<u64> {
    match unix_millis.checked_sub(EPOCH_MILLIS) {
        Some(elapsed) if elapsed <= MAX_TIMESTAMP => Some(elapsed),
        _ => None,
    }
}
