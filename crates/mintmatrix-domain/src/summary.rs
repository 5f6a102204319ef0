//! Licensing and dispute summaries
//!
//! Single-pass reductions over data the API already returned. Each view
//! recomputes from its own input; nothing is shared between them.

use crate::edge::{string_or_number, u64_or_string};
use crate::IpEdge;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Distinct license templates and terms seen across a set of edges
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseSummary {
    /// Unique license template contracts
    pub license_templates: BTreeSet<String>,
    /// Unique license terms ids
    pub license_terms_ids: BTreeSet<String>,
    /// Number of edges reduced, duplicates included
    pub edge_count: usize,
}

impl LicenseSummary {
    /// Reduce edges into unique templates and terms; blank values skipped
    pub fn from_edges(edges: &[IpEdge]) -> Self {
        let mut summary = Self {
            edge_count: edges.len(),
            ..Self::default()
        };
        for edge in edges {
            if !edge.license_template.is_empty() {
                summary.license_templates.insert(edge.license_template.clone());
            }
            if !edge.license_terms_id.is_empty() {
                summary.license_terms_ids.insert(edge.license_terms_id.clone());
            }
        }
        summary
    }
}

/// A dispute raised against an IP asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispute {
    /// Dispute id
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Disputed asset
    pub target_ip_id: String,

    /// Address that raised the dispute
    #[serde(default)]
    pub initiator: String,

    /// Tag naming the alleged infringement
    #[serde(default)]
    pub target_tag: String,

    /// Raw status string from the API
    #[serde(default)]
    pub status: String,

    /// Block that raised the dispute
    #[serde(default, deserialize_with = "u64_or_string")]
    pub block_number: u64,

    /// Block timestamp (unix seconds)
    #[serde(default, deserialize_with = "u64_or_string")]
    pub block_time: u64,
}

impl Dispute {
    /// Status folded into the three buckets the summary counts
    pub fn status_kind(&self) -> DisputeStatus {
        DisputeStatus::from_raw(&self.status)
    }
}

/// Dispute lifecycle bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisputeStatus {
    /// Raised and awaiting judgement
    Active,
    /// Judged, cancelled or otherwise closed
    Resolved,
    /// Anything the API may add later
    Other,
}

impl DisputeStatus {
    /// Classify a raw status string (case-insensitive)
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "raised" | "active" | "pending" | "open" => DisputeStatus::Active,
            "resolved" | "judged" | "cancelled" | "canceled" | "dismissed" | "closed" => {
                DisputeStatus::Resolved
            }
            _ => DisputeStatus::Other,
        }
    }
}

/// Counts of disputes by status bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeSummary {
    /// Disputes still open
    pub active: usize,
    /// Disputes closed
    pub resolved: usize,
    /// Disputes with an unrecognized status
    pub other: usize,
    /// All disputes
    pub total: usize,
}

impl DisputeSummary {
    /// Count disputes by status
    pub fn from_disputes(disputes: &[Dispute]) -> Self {
        disputes.iter().fold(Self::default(), |mut acc, d| {
            match d.status_kind() {
                DisputeStatus::Active => acc.active += 1,
                DisputeStatus::Resolved => acc.resolved += 1,
                DisputeStatus::Other => acc.other += 1,
            }
            acc.total += 1;
            acc
        })
    }

    /// True when at least one dispute is still open
    pub fn has_active(&self) -> bool {
        self.active > 0
    }
}
