//! Configuration file parsing for the Router.
//!
//! Loads bind settings plus the `[story]`, `[retry]`, `[royalty]` and
//! `[agent_keys]` tables from TOML. Every table is optional.

use mintmatrix_royalty::RoyaltyConfig;
use mintmatrix_story::{RetryConfig, StoryConfig};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Environment variable overriding `story.api_key`
pub const API_KEY_ENV: &str = "STORY_API_KEY";

/// Router configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is present but unusable
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Router configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Story Protocol API settings
    #[serde(default)]
    pub story: StoryConfig,

    /// Retry policy for Story Protocol reads
    #[serde(default)]
    pub retry: RetryConfig,

    /// Signer gateway and token contracts
    #[serde(default)]
    pub royalty: RoyaltyConfig,

    /// Agent signer key cache
    #[serde(default)]
    pub agent_keys: AgentKeyConfig,
}

/// Agent key cache settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AgentKeyConfig {
    /// Seconds a cached key stays usable (default: 900 = 15 minutes)
    #[serde(default = "default_key_ttl")]
    pub ttl_secs: u64,

    /// Seconds between sweeps of expired keys (default: 60)
    #[serde(default = "default_purge_interval")]
    pub purge_interval_secs: u64,
}

impl Default for AgentKeyConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_key_ttl(),
            purge_interval_secs: default_purge_interval(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8080
}

/// Default key TTL: 15 minutes
fn default_key_ttl() -> u64 {
    900
}

fn default_purge_interval() -> u64 {
    60
}

impl RouterConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: RouterConfig = toml::from_str(&contents)?;
        config.apply_env(std::env::var(API_KEY_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Let a non-empty `STORY_API_KEY` value replace the file's key
    pub fn apply_env(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.story.api_key = Some(key);
        }
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.story.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "story.page_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.agent_keys.ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "agent_keys.ttl_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.agent_keys.purge_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "agent_keys.purge_interval_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        self.royalty
            .token_registry()
            .map_err(|e| ConfigError::Invalid {
                field: "royalty",
                reason: e.to_string(),
            })?;
        Ok(())
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        RouterConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            story: StoryConfig::default(),
            retry: RetryConfig::default(),
            royalty: RoyaltyConfig::default(),
            agent_keys: AgentKeyConfig::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default_test_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.agent_keys.ttl_secs, 900);
        assert_eq!(config.story.chain, "story-aeneid");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000

            [story]
            api_key = "file-key"
            max_total = 40

            [retry]
            max_attempts = 5

            [royalty]
            gateway_url = "http://signer:3100"

            [agent_keys]
            ttl_secs = 60
        "#;

        let config: RouterConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.story.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.story.max_total, 40);
        assert_eq!(config.story.page_size, 50);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.backoff_step_ms, 1000);
        assert_eq!(config.royalty.gateway_url, "http://signer:3100");
        assert_eq!(config.agent_keys.ttl_secs, 60);
        assert_eq!(config.agent_keys.purge_interval_secs, 60);
    }

    #[test]
    fn test_zero_purge_interval_rejected() {
        let mut config = RouterConfig::default_test_config();
        config.agent_keys.purge_interval_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "agent_keys.purge_interval_secs", .. })
        ));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: RouterConfig = toml::from_str("").unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_env_overrides_file_key() {
        let mut config = RouterConfig::default_test_config();
        config.story.api_key = Some("file-key".to_string());

        config.apply_env(Some(String::new()));
        assert_eq!(config.story.api_key.as_deref(), Some("file-key"));

        config.apply_env(Some("env-key".to_string()));
        assert_eq!(config.story.api_key.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_from_file_rejects_bad_token_address() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[royalty]\nwip_address = \"0x12\"").unwrap();

        let err = RouterConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "royalty", .. }));
    }

    #[test]
    fn test_from_file_missing() {
        let err = RouterConfig::from_file("/nonexistent/router.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(_)));
    }
}
