//! Royalty tokens and base-unit amounts

use crate::{Address, DomainError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

/// Default address of the wrapped IP token (WIP) on Aeneid
pub const DEFAULT_WIP_ADDRESS: &str = "0x1514000000000000000000000000000000000000";

/// Default address of the MERC20 test token on Aeneid
pub const DEFAULT_MERC20_ADDRESS: &str = "0xF2104833d386a2734a4eB3B8ad6FC6812F29E38E";

/// Decimals shared by both royalty tokens
pub const TOKEN_DECIMALS: u32 = 18;

/// The closed set of ERC-20 tokens revenue can be claimed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoyaltyToken {
    /// Wrapped IP, the chain's native asset as an ERC-20
    #[default]
    Wip,
    /// Mock ERC-20 used on testnet
    Merc20,
}

impl RoyaltyToken {
    /// Every known token, in display order
    pub const ALL: [RoyaltyToken; 2] = [RoyaltyToken::Wip, RoyaltyToken::Merc20];

    /// Lowercase identifier used on the wire and in config
    pub fn as_str(&self) -> &'static str {
        match self {
            RoyaltyToken::Wip => "wip",
            RoyaltyToken::Merc20 => "merc20",
        }
    }

    /// Ticker shown to users
    pub fn symbol(&self) -> &'static str {
        match self {
            RoyaltyToken::Wip => "WIP",
            RoyaltyToken::Merc20 => "MERC20",
        }
    }
}

impl FromStr for RoyaltyToken {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wip" => Ok(RoyaltyToken::Wip),
            "merc20" => Ok(RoyaltyToken::Merc20),
            _ => Err(DomainError::UnknownToken(s.to_string())),
        }
    }
}

impl fmt::Display for RoyaltyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Address lookup for [`RoyaltyToken`]
///
/// Call sites ask the registry for a token's contract instead of branching
/// on hardcoded strings, so a deployment can repoint either token from
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRegistry {
    /// WIP contract
    pub wip: Address,
    /// MERC20 contract
    pub merc20: Address,
}

impl TokenRegistry {
    /// Registry with explicit addresses
    pub fn new(wip: Address, merc20: Address) -> Self {
        Self { wip, merc20 }
    }

    /// Contract address for a token
    pub fn address(&self, token: RoyaltyToken) -> &Address {
        match token {
            RoyaltyToken::Wip => &self.wip,
            RoyaltyToken::Merc20 => &self.merc20,
        }
    }

    /// Reverse lookup from a contract address
    pub fn token_for(&self, address: &Address) -> Option<RoyaltyToken> {
        RoyaltyToken::ALL
            .into_iter()
            .find(|token| self.address(*token) == address)
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self {
            wip: Address::from_trusted(DEFAULT_WIP_ADDRESS),
            merc20: Address::from_trusted(DEFAULT_MERC20_ADDRESS),
        }
    }
}

/// Token amount in base units (10^-18 of a display unit)
///
/// Serialized as a decimal string so JSON consumers never lose precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(u128);

impl TokenAmount {
    /// Zero
    pub const ZERO: TokenAmount = TokenAmount(0);

    /// Wrap a raw on-chain amount
    pub fn from_base_units(value: u128) -> Self {
        Self(value)
    }

    /// Raw on-chain amount
    pub fn base_units(&self) -> u128 {
        self.0
    }

    /// Approximate display value (divided by 10^18)
    ///
    /// # Examples
    ///
    /// ```
    /// use mintmatrix_domain::TokenAmount;
    ///
    /// let one = TokenAmount::from_base_units(1_000_000_000_000_000_000);
    /// assert_eq!(one.to_display(), 1.0);
    /// assert_eq!(one.display_string(), "1.0");
    /// ```
    pub fn to_display(&self) -> f64 {
        let scale = 10u128.pow(TOKEN_DECIMALS);
        let whole = (self.0 / scale) as f64;
        let frac = (self.0 % scale) as f64 / scale as f64;
        whole + frac
    }

    /// Exact decimal rendering with at least one fractional digit
    pub fn display_string(&self) -> String {
        let scale = 10u128.pow(TOKEN_DECIMALS);
        let whole = self.0 / scale;
        let frac = self.0 % scale;

        let digits = format!("{:0width$}", frac, width = TOKEN_DECIMALS as usize);
        let trimmed = digits.trim_end_matches('0');
        if trimmed.is_empty() {
            format!("{}.0", whole)
        } else {
            format!("{}.{}", whole, trimmed)
        }
    }

    /// Addition that saturates instead of overflowing
    pub fn saturating_add(self, other: TokenAmount) -> TokenAmount {
        TokenAmount(self.0.saturating_add(other.0))
    }

    /// True for zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Sum for TokenAmount {
    fn sum<I: Iterator<Item = TokenAmount>>(iter: I) -> Self {
        iter.fold(TokenAmount::ZERO, TokenAmount::saturating_add)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

impl FromStr for TokenAmount {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u128>().map(TokenAmount)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => s.parse().map_err(serde::de::Error::custom),
            serde_json::Value::Number(n) => n
                .as_u64()
                .map(|v| TokenAmount(v as u128))
                .ok_or_else(|| serde::de::Error::custom(format!("invalid amount: {}", n))),
            other => Err(serde::de::Error::custom(format!("invalid amount: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_token_parse() {
        assert_eq!("WIP".parse::<RoyaltyToken>().unwrap(), RoyaltyToken::Wip);
        assert_eq!("merc20".parse::<RoyaltyToken>().unwrap(), RoyaltyToken::Merc20);
        assert!(matches!(
            "usdc".parse::<RoyaltyToken>(),
            Err(DomainError::UnknownToken(_))
        ));
    }

    #[test]
    fn test_registry_lookup_both_ways() {
        let registry = TokenRegistry::default();
        assert_eq!(registry.address(RoyaltyToken::Wip).as_str(), DEFAULT_WIP_ADDRESS);

        let merc = Address::parse(&DEFAULT_MERC20_ADDRESS.to_lowercase()).unwrap();
        assert_eq!(registry.token_for(&merc), Some(RoyaltyToken::Merc20));

        let unknown = Address::parse("0x0000000000000000000000000000000000000001").unwrap();
        assert_eq!(registry.token_for(&unknown), None);
    }

    #[test]
    fn test_one_token_displays_as_one() {
        let amount = TokenAmount::from_base_units(ONE);
        assert_eq!(amount.to_display(), 1.0);
        assert_eq!(amount.display_string(), "1.0");
    }

    #[test]
    fn test_fractional_display() {
        assert_eq!(TokenAmount::from_base_units(ONE + ONE / 2).display_string(), "1.5");
        assert_eq!(TokenAmount::from_base_units(1).display_string(), "0.000000000000000001");
        assert_eq!(TokenAmount::ZERO.display_string(), "0.0");
    }

    #[test]
    fn test_sum_saturates() {
        let total: TokenAmount = vec![
            TokenAmount::from_base_units(u128::MAX),
            TokenAmount::from_base_units(5),
        ]
        .into_iter()
        .sum();
        assert_eq!(total.base_units(), u128::MAX);
    }

    #[test]
    fn test_amount_serde_accepts_string_and_number() {
        let from_str: TokenAmount = serde_json::from_str("\"1000000000000000000\"").unwrap();
        let from_num: TokenAmount = serde_json::from_str("42").unwrap();
        assert_eq!(from_str.base_units(), ONE);
        assert_eq!(from_num.base_units(), 42);
        assert_eq!(serde_json::to_string(&from_num).unwrap(), "\"42\"");
    }
}
