//! Story Protocol API connection settings

use crate::paginate::{PageOptions, DEFAULT_MAX_TOTAL, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

/// Default API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.storyapis.com/api/v3";

/// Default chain header value
pub const DEFAULT_CHAIN: &str = "story-aeneid";

/// Default number of parents/children expanded one more level
pub const DEFAULT_FAMILY_EXPANSION: usize = 5;

/// Settings for [`crate::StoryClient`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryConfig {
    /// Base URL, without trailing slash
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Value for the `X-Api-Key` header
    #[serde(default)]
    pub api_key: Option<String>,

    /// Value for the `X-Chain` header
    #[serde(default = "default_chain")]
    pub chain: String,

    /// Items requested per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Cap on accumulated items per list call
    #[serde(default = "default_max_total")]
    pub max_total: usize,

    /// Parents/children expanded when building a family tree
    #[serde(default = "default_family_expansion")]
    pub family_expansion: usize,

    /// Per-request timeout; no timeout when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_chain() -> String {
    DEFAULT_CHAIN.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_max_total() -> usize {
    DEFAULT_MAX_TOTAL
}

fn default_family_expansion() -> usize {
    DEFAULT_FAMILY_EXPANSION
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key: None,
            chain: default_chain(),
            page_size: DEFAULT_PAGE_SIZE,
            max_total: DEFAULT_MAX_TOTAL,
            family_expansion: DEFAULT_FAMILY_EXPANSION,
            timeout_secs: None,
        }
    }
}

impl StoryConfig {
    /// Pagination settings
    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            page_size: self.page_size,
            max_total: self.max_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoryConfig::default();
        assert_eq!(config.chain, "story-aeneid");
        assert_eq!(config.page_options(), PageOptions { page_size: 50, max_total: 100 });
        assert_eq!(config.family_expansion, 5);
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_partial_deserialize() {
        let config: StoryConfig =
            serde_json::from_str(r#"{"api_key": "k", "max_total": 20}"#).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.max_total, 20);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }
}
