//! Royalty settings

use crate::RoyaltyError;
use mintmatrix_domain::token::{DEFAULT_MERC20_ADDRESS, DEFAULT_WIP_ADDRESS};
use mintmatrix_domain::{Address, TokenRegistry};
use serde::{Deserialize, Serialize};

/// Default signer gateway endpoint
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:3100";

/// Signer gateway and token contract settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyConfig {
    /// Base URL of the signer gateway
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// WIP token contract
    #[serde(default = "default_wip_address")]
    pub wip_address: String,

    /// MERC20 token contract
    #[serde(default = "default_merc20_address")]
    pub merc20_address: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_gateway_url() -> String {
    DEFAULT_GATEWAY_URL.to_string()
}

fn default_wip_address() -> String {
    DEFAULT_WIP_ADDRESS.to_string()
}

fn default_merc20_address() -> String {
    DEFAULT_MERC20_ADDRESS.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for RoyaltyConfig {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            wip_address: default_wip_address(),
            merc20_address: default_merc20_address(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RoyaltyConfig {
    /// Token registry built from the configured addresses
    pub fn token_registry(&self) -> Result<TokenRegistry, RoyaltyError> {
        Ok(TokenRegistry::new(
            Address::parse(&self.wip_address)?,
            Address::parse(&self.merc20_address)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_matches_domain_defaults() {
        let registry = RoyaltyConfig::default().token_registry().unwrap();
        assert_eq!(registry, TokenRegistry::default());
    }

    #[test]
    fn test_bad_address_rejected() {
        let config = RoyaltyConfig {
            merc20_address: "0x123".to_string(),
            ..RoyaltyConfig::default()
        };
        assert!(matches!(
            config.token_registry(),
            Err(RoyaltyError::Validation(_))
        ));
    }
}
