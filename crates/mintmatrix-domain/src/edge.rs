//! IP asset edges and the per-asset relationship view

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A directed parent -> child relationship between two IP assets
///
/// Edges record a historical on-chain derivative registration. They are
/// never updated once observed; new on-chain activity only appends edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpEdge {
    /// Child-side asset id
    pub ip_id: String,

    /// Parent-side asset id
    pub parent_ip_id: String,

    /// License template contract governing the relationship
    #[serde(default)]
    pub license_template: String,

    /// License terms id attached to the parent
    #[serde(default, deserialize_with = "string_or_number")]
    pub license_terms_id: String,

    /// License token burned to register the derivative
    #[serde(default, deserialize_with = "string_or_number")]
    pub license_token_id: String,

    /// Block that carried the registration
    #[serde(default, deserialize_with = "u64_or_string")]
    pub block_number: u64,

    /// Block timestamp (unix seconds)
    #[serde(default, deserialize_with = "u64_or_string")]
    pub block_time: u64,

    /// Registration transaction hash
    #[serde(default)]
    pub transaction_hash: String,

    /// Position of the transaction within its block
    #[serde(default, deserialize_with = "u64_or_string")]
    pub transaction_index: u64,
}

impl IpEdge {
    /// Minimal edge between two assets, provenance fields zeroed
    pub fn new(ip_id: impl Into<String>, parent_ip_id: impl Into<String>) -> Self {
        Self {
            ip_id: ip_id.into(),
            parent_ip_id: parent_ip_id.into(),
            license_template: String::new(),
            license_terms_id: String::new(),
            license_token_id: String::new(),
            block_number: 0,
            block_time: 0,
            transaction_hash: String::new(),
            transaction_index: 0,
        }
    }

    /// Set the license template and terms id
    pub fn with_license(mut self, template: impl Into<String>, terms_id: impl Into<String>) -> Self {
        self.license_template = template.into();
        self.license_terms_id = terms_id.into();
        self
    }

    /// Set the block number
    pub fn at_block(mut self, block_number: u64) -> Self {
        self.block_number = block_number;
        self
    }
}

/// Relationship view for a single asset
///
/// `parents` holds edges where the asset is the child (`ipId = target`),
/// `children` holds edges where it is the parent (`parentIpId = target`).
/// `all_relationships` is `parents` followed by `children`, duplicates kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpRelationships {
    /// Edges naming this asset's parents
    pub parents: Vec<IpEdge>,
    /// Edges naming this asset's children
    pub children: Vec<IpEdge>,
    /// Concatenation of `parents` and `children`
    pub all_relationships: Vec<IpEdge>,
}

impl IpRelationships {
    /// Combine the two edge sets; order is parents first
    pub fn new(parents: Vec<IpEdge>, children: Vec<IpEdge>) -> Self {
        let all_relationships = parents.iter().chain(children.iter()).cloned().collect();
        Self {
            parents,
            children,
            all_relationships,
        }
    }

    /// True when neither side has any edge
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty() && self.children.is_empty()
    }
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

pub(crate) fn u64_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("not an unsigned integer: {}", n))),
        Value::String(s) if s.is_empty() => Ok(0),
        Value::String(s) => s.parse().map_err(serde::de::Error::custom),
        other => Err(serde::de::Error::custom(format!(
            "expected number or numeric string, got {}",
            other
        ))),
    }
}
