//! Royalty claim requests and results
//!
//! A claim pulls accumulated revenue out of an ancestor IP's royalty vault.
//! The chain is the only ledger: results are reported back to the caller and
//! never persisted here.

use crate::{Address, DomainError, RoyaltyToken, TokenAmount};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One claim against an ancestor IP's royalty vault
///
/// Leaving `child_ip_ids` and `royalty_policies` empty claims the
/// ancestor's own revenue. Filling them claims what flowed up from those
/// specific children; the two lists pair up by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    /// IP whose vault is claimed from
    pub ancestor_ip_id: Address,

    /// Wallet or IP account receiving the revenue
    pub claimer: Address,

    /// Children whose revenue should be pulled up first
    #[serde(default)]
    pub child_ip_ids: Vec<Address>,

    /// Royalty policy for each child, same order as `child_ip_ids`
    #[serde(default)]
    pub royalty_policies: Vec<Address>,

    /// Token to claim in
    #[serde(default)]
    pub token: RoyaltyToken,
}

impl ClaimRequest {
    /// Claim of the ancestor's own revenue
    pub fn own_revenue(ancestor_ip_id: Address, claimer: Address, token: RoyaltyToken) -> Self {
        Self {
            ancestor_ip_id,
            claimer,
            child_ip_ids: Vec::new(),
            royalty_policies: Vec::new(),
            token,
        }
    }

    /// Add a child and the royalty policy it pays through
    pub fn with_child(mut self, child_ip_id: Address, royalty_policy: Address) -> Self {
        self.child_ip_ids.push(child_ip_id);
        self.royalty_policies.push(royalty_policy);
        self
    }

    /// Check structural consistency
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.child_ip_ids.len() != self.royalty_policies.len() {
            return Err(DomainError::MismatchedClaimLists {
                child_ip_ids: self.child_ip_ids.len(),
                royalty_policies: self.royalty_policies.len(),
            });
        }
        Ok(())
    }
}

/// Post-claim token handling
///
/// The batch path always uses [`ClaimOptions::default`]; only the
/// single-child flow may turn unwrapping off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimOptions {
    /// Move claimed tokens out of the IP account to the claimer wallet
    pub auto_transfer_all_claimed_tokens_from_ip: bool,

    /// Unwrap WIP into the native asset after claiming
    pub auto_unwrap_ip_tokens: bool,
}

impl ClaimOptions {
    /// Default options with an explicit unwrap choice
    pub fn with_unwrap(unwrap: bool) -> Self {
        Self {
            auto_unwrap_ip_tokens: unwrap,
            ..Self::default()
        }
    }
}

impl Default for ClaimOptions {
    fn default() -> Self {
        Self {
            auto_transfer_all_claimed_tokens_from_ip: true,
            auto_unwrap_ip_tokens: true,
        }
    }
}

/// Amount of one token moved by a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimedToken {
    /// IP the revenue was claimed for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_id: Option<Address>,
    /// Token contract
    pub token: Address,
    /// Base-unit amount
    pub amount: TokenAmount,
}

/// Outcome of a claim call
///
/// A failed claim carries no transaction hashes and no claimed tokens.
/// Callers check [`ClaimResult::is_success`] before reporting success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResult {
    /// Submitted transaction hashes
    #[serde(default)]
    pub tx_hashes: Vec<String>,

    /// Tokens claimed, present only on success
    #[serde(default)]
    pub claimed_tokens: Option<Vec<ClaimedToken>>,

    /// Raw receipt as returned by the chain client
    #[serde(default)]
    pub receipt: Option<Value>,
}

impl ClaimResult {
    /// Result representing a failed claim
    pub fn failed() -> Self {
        Self::default()
    }

    /// At least one non-empty transaction hash was returned
    pub fn is_success(&self) -> bool {
        self.tx_hashes.iter().any(|h| !h.is_empty())
    }

    /// Total claimed in base units across all entries for `token`
    pub fn total_claimed(&self, token: &Address) -> TokenAmount {
        self.claimed_tokens
            .iter()
            .flatten()
            .filter(|c| &c.token == token)
            .map(|c| c.amount)
            .sum()
    }
}
