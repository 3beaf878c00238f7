use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::SleetId;

/// Serializes as the native `u64`.
impl Serialize for SleetId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_raw().serialize(s)
    }
}

/// Deserializes from a native `u64`, rejecting values with the reserved bit
/// set.
impl<'de> Deserialize<'de> for SleetId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(d)?;
        Self::try_from_raw(raw).map_err(de::Error::custom)
    }
}

struct StrVisitor<F> {
    expecting: &'static str,
    parse: F,
}

impl<F, E> de::Visitor<'_> for StrVisitor<F>
where
    F: FnOnce(&str) -> Result<SleetId, E>,
    E: fmt::Display,
{
    type Value = SleetId;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.expecting)
    }

    fn visit_str<Er>(self, v: &str) -> Result<Self::Value, Er>
    where
        Er: de::Error,
    {
        (self.parse)(v).map_err(de::Error::custom)
    }
}

/// Serialize an identifier as its decimal string, for consumers that cannot
/// hold a full 64-bit integer (JavaScript numbers, for one).
///
/// ```
/// # #[cfg(feature = "serde")] {
/// use sleet::{SleetId, as_string};
///
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Row {
///     #[serde(with = "as_string")]
///     id: SleetId,
/// }
/// # }
/// ```
pub mod as_string {
    use super::{Deserializer, Serializer, StrVisitor};
    use crate::SleetId;

    /// Serialize an identifier as a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SleetId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// Deserialize an identifier from a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails or the string is
    /// not the decimal form of a valid identifier.
    pub fn deserialize<'de, D>(d: D) -> Result<SleetId, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_str(StrVisitor {
            expecting: "a decimal identifier string",
            parse: str::parse::<SleetId>,
        })
    }
}

#[cfg_attr(docsrs, doc(cfg(all(feature = "serde", feature = "base64"))))]
#[cfg(feature = "base64")]
pub mod as_base64 {
    use super::{Deserializer, Serializer, StrVisitor};
    use crate::SleetId;

    /// Serialize an identifier as base64 of its decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SleetId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&id.to_base64())
    }

    /// Deserialize an identifier from its base64 form.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails or the string
    /// does not decode to a valid identifier.
    pub fn deserialize<'de, D>(d: D) -> Result<SleetId, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_str(StrVisitor {
            expecting: "a base64 encoded identifier",
            parse: SleetId::from_base64,
        })
    }
}
