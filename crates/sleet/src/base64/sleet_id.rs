use crate::{
    DecodeError, SleetId,
    base64::{decode_base64, encode_base64},
    id::decimal_bytes,
};

/// Base64 form of a raw identifier.
///
/// The bytes encoded are those of the decimal string, not the integer, so
/// `1` becomes `"MQ=="`.
pub fn base64_string(raw: u64) -> String {
    encode_base64(&decimal_bytes(raw))
}

impl SleetId {
    /// Standard padded base64 of the decimal string form.
    ///
    /// # Example
    ///
    /// ```
    /// use sleet::SleetId;
    ///
    /// let id: SleetId = "123".parse().unwrap();
    /// assert_eq!(id.to_base64(), "MTIz");
    /// assert_eq!(SleetId::from_base64("MTIz"), Ok(id));
    /// ```
    pub fn to_base64(&self) -> String {
        base64_string(self.to_raw())
    }

    /// Decodes the base64 form produced by [`Self::to_base64`].
    ///
    /// # Errors
    ///
    /// Returns an error if `encoded` is not valid base64 or does not decode
    /// to the decimal digits of a valid identifier.
    pub fn from_base64(encoded: &str) -> Result<Self, DecodeError> {
        Self::from_decimal_bytes(&decode_base64(encoded)?)
    }
}
