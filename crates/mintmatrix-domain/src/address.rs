//! Hex addresses for IP assets, wallets and contracts

use crate::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 20-byte account address rendered as `0x`-prefixed hex
///
/// IP ids, wallet addresses, royalty policies and token contracts all share
/// this shape. Parsing accepts input with or without the `0x` prefix and
/// keeps the original letter case so checksummed addresses survive a round
/// trip. Equality ignores case.
///
/// # Examples
///
/// ```
/// use mintmatrix_domain::Address;
///
/// let a: Address = "1514000000000000000000000000000000000000".parse().unwrap();
/// assert_eq!(a.as_str(), "0x1514000000000000000000000000000000000000");
/// assert!("0x12".parse::<Address>().is_err());
/// ```
#[derive(Debug, Clone, Eq)]
pub struct Address(String);

impl Address {
    /// Parse and normalize an address
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidAddress`] unless the input holds exactly
    /// 40 hex digits after an optional `0x`/`0X` prefix.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DomainError::InvalidAddress(value.to_string()));
        }

        Ok(Self(format!("0x{}", digits)))
    }

    /// Wrap a compile-time constant already in `0x` form
    pub(crate) fn from_trusted(value: &'static str) -> Self {
        Self(value.to_string())
    }

    /// The `0x`-prefixed string form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a raw string from the API
    pub fn matches(&self, raw: &str) -> bool {
        Address::parse(raw).map(|other| other == *self).unwrap_or(false)
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl std::hash::Hash for Address {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_ascii_lowercase().hash(state);
    }
}

impl FromStr for Address {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Address::parse(&raw).map_err(serde::de::Error::custom)
    }
}
