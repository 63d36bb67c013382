/*
[INPUT]:  Party-supplied account address strings
[OUTPUT]: Validated EvmAddress values
[POS]:    Data layer - address validation for request payloads
[UPDATE]: When address format rules change
*/

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::http::ValidationError;

const ADDRESS_HEX_LEN: usize = 40;

/// A `0x`-prefixed 20-byte account address.
///
/// Digit casing is kept exactly as supplied; no checksum is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EvmAddress(String);

impl EvmAddress {
    /// Validate an address supplied for `field`.
    pub fn parse_field(raw: &str, field: &str) -> Result<Self, ValidationError> {
        let digits = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .filter(|digits| {
                digits.len() == ADDRESS_HEX_LEN && digits.bytes().all(|b| b.is_ascii_hexdigit())
            })
            .ok_or_else(|| ValidationError::InvalidAddress {
                field: field.to_string(),
                value: raw.to_string(),
            })?;

        Ok(Self(format!("0x{digits}")))
    }

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        Self::parse_field(raw, "address")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened display form, e.g. `0x0039...34a6`
    pub fn short(&self, length: usize) -> String {
        if self.0.len() < length * 2 + 2 {
            return self.0.clone();
        }
        format!("{}...{}", &self.0[..length + 2], &self.0[self.0.len() - length..])
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EvmAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for EvmAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EvmAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        EvmAddress::parse(&raw).map_err(serde::de::Error::custom)
    }
}
