//! Presentation forms of an identifier. These carry no semantics beyond the
//! integer value they are derived from.

use crate::{DecodeError, SleetId};

/// Size of the big-endian byte form.
pub const BE_BYTES_SIZE: usize = core::mem::size_of::<u64>();

/// Width of the zero-padded decimal form; `i64::MAX` has 19 digits.
pub const PADDED_DECIMAL_WIDTH: usize = 19;

/// Decimal string form of a raw identifier.
pub fn decimal_string(raw: u64) -> String {
    raw.to_string()
}

/// Bytes of the decimal string form.
pub fn decimal_bytes(raw: u64) -> Vec<u8> {
    decimal_string(raw).into_bytes()
}

/// Raw identifier as 8 big-endian bytes.
pub const fn be_bytes(raw: u64) -> [u8; BE_BYTES_SIZE] {
    raw.to_be_bytes()
}

impl SleetId {
    /// Decimal string form, identical to [`Display`](core::fmt::Display).
    pub fn to_decimal_string(&self) -> String {
        decimal_string(self.to_raw())
    }

    /// Decimal form left-padded with zeros to a fixed width, so that
    /// lexicographic order matches numeric order.
    pub fn to_padded_string(&self) -> String {
        format!("{:0width$}", self.to_raw(), width = PADDED_DECIMAL_WIDTH)
    }

    /// Bytes of the decimal string form.
    pub fn to_decimal_bytes(&self) -> Vec<u8> {
        decimal_bytes(self.to_raw())
    }

    /// The raw value as 8 big-endian bytes.
    pub const fn to_be_bytes(&self) -> [u8; BE_BYTES_SIZE] {
        be_bytes(self.to_raw())
    }

    /// Decodes the big-endian byte form.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ReservedBitSet`] if the first byte has its high
    /// bit set.
    pub const fn from_be_bytes(bytes: [u8; BE_BYTES_SIZE]) -> Result<Self, DecodeError> {
        Self::try_from_raw(u64::from_be_bytes(bytes))
    }

    /// Decodes a big-endian byte slice of exactly 8 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidLength`] for any other length, or
    /// [`DecodeError::ReservedBitSet`] as [`Self::from_be_bytes`].
    pub fn from_be_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let bytes: [u8; BE_BYTES_SIZE] = bytes
            .try_into()
            .map_err(|_| DecodeError::InvalidLength { len: bytes.len() })?;
        Self::from_be_bytes(bytes)
    }

    /// Decodes the byte form of the decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not ASCII digits of a valid
    /// identifier.
    pub fn from_decimal_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if let Some(index) = bytes.iter().position(|b| !b.is_ascii_digit()) {
            return Err(DecodeError::InvalidByte {
                byte: bytes[index],
                index,
            });
        }
        let s = core::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidDigits)?;
        s.parse()
    }
}
