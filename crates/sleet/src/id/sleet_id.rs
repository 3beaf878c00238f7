use core::{fmt, str::FromStr};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::{
    DecodeError,
    id::layout::{
        self, MAX_NODE_ID, MAX_REGION_ID, MAX_SEQUENCE, MAX_TIMESTAMP, NODE_ID_BITS,
        REGION_ID_BITS, RESERVED_MASK, SEQUENCE_BITS, TIMESTAMP_BITS,
    },
};

/// A 64-bit identifier produced by an allocator.
///
/// - 1 bit reserved (always zero)
/// - 39 bits timestamp (ms since [`EPOCH`])
/// - 5 bits region ID
/// - 9 bits node ID
/// - 10 bits sequence
///
/// Identifiers are immutable once produced and order by their raw value,
/// which is the order they were issued in by a single allocator.
///
/// # Example
///
/// ```
/// use sleet::SleetId;
///
/// let id = SleetId::from_components(1000, 1, 511, 3);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.region_id(), 1);
/// assert_eq!(id.node_id(), 511);
/// assert_eq!(id.sequence(), 3);
/// ```
///
/// [`EPOCH`]: crate::EPOCH
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SleetId {
    id: u64,
}

impl SleetId {
    /// Packs the components into an identifier.
    ///
    /// Components wider than their field are truncated to the field width.
    pub const fn from_components(
        elapsed_ms: u64,
        region_id: u8,
        node_id: u16,
        sequence: u16,
    ) -> Self {
        Self {
            id: layout::pack(elapsed_ms, region_id, node_id, sequence),
        }
    }

    /// Wraps a raw value, clearing the reserved bit.
    pub const fn from_raw(raw: u64) -> Self {
        Self {
            id: raw & !RESERVED_MASK,
        }
    }

    /// Wraps a raw value, rejecting it if the reserved bit is set.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ReservedBitSet`] for values above `i64::MAX`.
    pub const fn try_from_raw(raw: u64) -> Result<Self, DecodeError> {
        if raw & RESERVED_MASK != 0 {
            return Err(DecodeError::ReservedBitSet { raw });
        }
        Ok(Self { id: raw })
    }

    /// Returns the raw integer value.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Returns the value as a signed integer. Never negative.
    pub const fn to_i64(&self) -> i64 {
        self.id as i64
    }

    /// Milliseconds elapsed since [`EPOCH`](crate::EPOCH) at generation.
    pub const fn timestamp(&self) -> u64 {
        layout::timestamp_of(self.id)
    }

    /// Generation time in unix milliseconds.
    pub const fn unix_millis(&self) -> u64 {
        layout::unix_millis_of(self.id)
    }

    /// Generation time in whole unix seconds.
    pub const fn time(&self) -> u64 {
        self.unix_millis() / 1_000
    }

    /// Generation time as a [`SystemTime`].
    pub fn system_time(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.unix_millis())
    }

    /// Region the identifier was issued in.
    pub const fn region_id(&self) -> u8 {
        layout::region_id_of(self.id)
    }

    /// Node that issued the identifier.
    pub const fn node_id(&self) -> u16 {
        layout::node_id_of(self.id)
    }

    /// Position of the identifier within its millisecond.
    pub const fn sequence(&self) -> u16 {
        layout::sequence_of(self.id)
    }

    /// Largest encodable elapsed time.
    pub const fn max_timestamp() -> u64 {
        MAX_TIMESTAMP
    }

    /// Largest encodable region id.
    pub const fn max_region_id() -> u8 {
        MAX_REGION_ID
    }

    /// Largest encodable node id.
    pub const fn max_node_id() -> u16 {
        MAX_NODE_ID
    }

    /// Largest sequence value.
    pub const fn max_sequence() -> u16 {
        MAX_SEQUENCE
    }

    fn fields(&self) -> [(&'static str, u32, u64); 5] {
        [
            ("reserved", 1, 0),
            ("timestamp", TIMESTAMP_BITS, self.timestamp()),
            ("region", REGION_ID_BITS, u64::from(self.region_id())),
            ("node", NODE_ID_BITS, u64::from(self.node_id())),
            ("sequence", SEQUENCE_BITS, u64::from(self.sequence())),
        ]
    }
}

impl fmt::Display for SleetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SleetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return f
                .debug_struct("SleetId")
                .field("id", &self.id)
                .field("timestamp", &self.timestamp())
                .field("region_id", &self.region_id())
                .field("node_id", &self.node_id())
                .field("sequence", &self.sequence())
                .finish();
        }
        write_bit_layout_debug(f, self)
    }
}

fn center(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.len());
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(pad - left))
}

/// Renders the `{:#?}` table: raw value followed by one column per field.
fn write_bit_layout_debug(f: &mut fmt::Formatter<'_>, id: &SleetId) -> fmt::Result {
    let fields = id.fields();
    let rows: Vec<[String; 3]> = fields
        .iter()
        .map(|(name, bits, value)| {
            [
                format!("{name} ({bits})"),
                value.to_string(),
                format!("0x{value:x}"),
            ]
        })
        .collect();
    let widths: Vec<usize> = rows
        .iter()
        .map(|cells| cells.iter().map(String::len).max().unwrap_or(0) + 2)
        .collect();

    let border = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
        write!(f, "        +")?;
        for &w in &widths {
            write!(f, "{}+", "-".repeat(w))?;
        }
        writeln!(f)
    };

    writeln!(f, "SleetId {{")?;
    writeln!(f, "    raw id     : 0x{:016x} ({})", id.id, id.id)?;
    writeln!(f, "    layout     :")?;
    border(f)?;
    for line in 0..3 {
        write!(f, "        |")?;
        for (cells, &w) in rows.iter().zip(&widths) {
            write!(f, "{}|", center(&cells[line], w))?;
        }
        writeln!(f)?;
        if line == 0 {
            border(f)?;
        }
    }
    border(f)?;
    write!(f, "}}")
}

impl FromStr for SleetId {
    type Err = DecodeError;

    /// Parses the decimal form produced by [`Display`](fmt::Display).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > 20 {
            return Err(DecodeError::InvalidLength { len: s.len() });
        }
        if let Some(index) = s.bytes().position(|b| !b.is_ascii_digit()) {
            return Err(DecodeError::InvalidByte {
                byte: s.as_bytes()[index],
                index,
            });
        }
        let raw: u64 = s.parse().map_err(|_| DecodeError::InvalidDigits)?;
        Self::try_from_raw(raw)
    }
}

impl From<SleetId> for u64 {
    fn from(id: SleetId) -> Self {
        id.to_raw()
    }
}

impl From<SleetId> for i64 {
    fn from(id: SleetId) -> Self {
        id.to_i64()
    }
}

impl TryFrom<u64> for SleetId {
    type Error = DecodeError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::try_from_raw(raw)
    }
}

impl TryFrom<i64> for SleetId {
    type Error = DecodeError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::try_from_raw(raw as u64)
    }
}
