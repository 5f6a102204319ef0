//! Sparse edge filters
//!
//! Callers build filters with only the fields they care about. Before a
//! filter reaches the wire every empty field is stripped, so an all-empty
//! filter produces no `where` clause at all.

use crate::IpEdge;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filter over [`IpEdge`] fields, serialized as the API's `where` clause
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeFilter {
    /// Child-side asset id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_id: Option<String>,

    /// Parent-side asset id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ip_id: Option<String>,

    /// License template contract
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_template: Option<String>,

    /// License terms id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_terms_id: Option<String>,

    /// License token id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_token_id: Option<String>,

    /// Registration transaction hash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,

    /// Block number, as a decimal string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<String>,
}

impl EdgeFilter {
    /// Edges where `ip_id` is the child (yields its parents)
    pub fn by_child(ip_id: impl Into<String>) -> Self {
        Self {
            ip_id: Some(ip_id.into()),
            ..Self::default()
        }
    }

    /// Edges where `ip_id` is the parent (yields its children)
    pub fn by_parent(ip_id: impl Into<String>) -> Self {
        Self {
            parent_ip_id: Some(ip_id.into()),
            ..Self::default()
        }
    }

    /// Copy with every blank field removed
    ///
    /// Idempotent: `f.cleaned().cleaned() == f.cleaned()`.
    pub fn cleaned(&self) -> Self {
        fn keep(field: &Option<String>) -> Option<String> {
            field.as_ref().filter(|v| !v.trim().is_empty()).cloned()
        }

        Self {
            ip_id: keep(&self.ip_id),
            parent_ip_id: keep(&self.parent_ip_id),
            license_template: keep(&self.license_template),
            license_terms_id: keep(&self.license_terms_id),
            license_token_id: keep(&self.license_token_id),
            transaction_hash: keep(&self.transaction_hash),
            block_number: keep(&self.block_number),
        }
    }

    /// True when no field survives cleaning
    pub fn is_empty(&self) -> bool {
        self.cleaned() == Self::default()
    }

    /// The cleaned filter as a JSON `where` clause, or `None` when empty
    pub fn to_where(&self) -> Option<Value> {
        let cleaned = self.cleaned();
        if cleaned == Self::default() {
            return None;
        }
        serde_json::to_value(cleaned).ok()
    }

    /// Client-side predicate equivalent to the server-side filter
    ///
    /// Blank fields match everything. Comparisons ignore ASCII case since
    /// ids come back checksummed while callers often pass lowercase.
    pub fn matches(&self, edge: &IpEdge) -> bool {
        let cleaned = self.cleaned();
        let eq = |want: &Option<String>, have: &str| {
            want.as_deref()
                .map_or(true, |w| w.trim().eq_ignore_ascii_case(have))
        };

        eq(&cleaned.ip_id, &edge.ip_id)
            && eq(&cleaned.parent_ip_id, &edge.parent_ip_id)
            && eq(&cleaned.license_template, &edge.license_template)
            && eq(&cleaned.license_terms_id, &edge.license_terms_id)
            && eq(&cleaned.license_token_id, &edge.license_token_id)
            && eq(&cleaned.transaction_hash, &edge.transaction_hash)
            && eq(&cleaned.block_number, &edge.block_number.to_string())
    }
}
