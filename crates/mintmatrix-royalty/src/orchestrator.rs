//! Revenue Claim Orchestrator
//!
//! Queries claimable revenue across many IPs and submits batched claims.
//! Claims are one-shot: the orchestrator never retries a submission, and a
//! failed submission is reported as an empty [`ClaimResult`] rather than an
//! error so callers can tell "nothing happened" from "bad request".

use crate::client::{ResolvedClaim, RoyaltyClient, SignerKey};
use crate::RoyaltyError;
use futures::future::join_all;
use mintmatrix_domain::{
    Address, ClaimOptions, ClaimRequest, ClaimResult, RoyaltyToken, TokenAmount, TokenRegistry,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Claimable revenue of one IP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimableRevenue {
    /// IP whose vault was queried
    pub ip_id: Address,
    /// Base-unit amount
    pub amount: TokenAmount,
}

/// Claimable revenue summed over several IPs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimableTotal {
    /// Token the amounts are in
    pub token: RoyaltyToken,
    /// Per-IP amounts in input order; failed queries count as zero
    pub per_ip: Vec<ClaimableRevenue>,
    /// IPs whose query failed
    pub failed: Vec<Address>,
    /// Sum in base units
    pub total: TokenAmount,
    /// Sum divided by 10^18
    pub total_display: String,
}

/// Coordinates royalty queries and claims over a [`RoyaltyClient`]
#[derive(Clone)]
pub struct RevenueOrchestrator {
    client: Arc<dyn RoyaltyClient>,
    tokens: TokenRegistry,
}

impl RevenueOrchestrator {
    /// Orchestrator resolving tokens through `tokens`
    pub fn new(client: Arc<dyn RoyaltyClient>, tokens: TokenRegistry) -> Self {
        Self { client, tokens }
    }

    /// Token contracts in use
    pub fn tokens(&self) -> &TokenRegistry {
        &self.tokens
    }

    /// Claimable revenue of a single IP
    pub async fn claimable_revenue(
        &self,
        ip_id: &Address,
        claimer: &Address,
        token: RoyaltyToken,
    ) -> Result<ClaimableRevenue, RoyaltyError> {
        let amount = self
            .client
            .claimable_revenue(ip_id, claimer, self.tokens.address(token))
            .await?;
        Ok(ClaimableRevenue {
            ip_id: ip_id.clone(),
            amount,
        })
    }

    /// Claimable revenue over many IPs, queried concurrently
    ///
    /// A failed query is logged and counts as zero.
    pub async fn total_claimable_revenue(
        &self,
        ip_ids: &[Address],
        claimer: &Address,
        token: RoyaltyToken,
    ) -> ClaimableTotal {
        let queries = ip_ids
            .iter()
            .map(|ip_id| self.claimable_revenue(ip_id, claimer, token));
        let results = join_all(queries).await;

        let mut per_ip = Vec::with_capacity(ip_ids.len());
        let mut failed = Vec::new();
        for (ip_id, result) in ip_ids.iter().zip(results) {
            match result {
                Ok(revenue) => per_ip.push(revenue),
                Err(e) => {
                    tracing::warn!(ip_id = %ip_id, error = %e, "Claimable revenue query failed, counting as zero");
                    failed.push(ip_id.clone());
                    per_ip.push(ClaimableRevenue {
                        ip_id: ip_id.clone(),
                        amount: TokenAmount::ZERO,
                    });
                }
            }
        }

        let total: TokenAmount = per_ip.iter().map(|r| r.amount).sum();
        tracing::info!(
            ips = ip_ids.len(),
            failed = failed.len(),
            total = %total,
            token = %token,
            "Computed claimable revenue"
        );

        ClaimableTotal {
            token,
            per_ip,
            failed,
            total,
            total_display: total.display_string(),
        }
    }

    /// Claim all revenue for several ancestors in one submission
    ///
    /// Options are fixed to auto-transfer and auto-unwrap. Invalid requests
    /// are rejected before submission; a failed submission is logged and
    /// returned as [`ClaimResult::failed`].
    pub async fn batch_claim_all_revenue(
        &self,
        signer: &SignerKey,
        requests: &[ClaimRequest],
    ) -> Result<ClaimResult, RoyaltyError> {
        if requests.is_empty() {
            return Err(RoyaltyError::Validation(
                "at least one claim request is required".to_string(),
            ));
        }
        let claims = requests
            .iter()
            .map(|r| ResolvedClaim::resolve(r, &self.tokens))
            .collect::<Result<Vec<_>, _>>()?;

        match self
            .client
            .batch_claim_all_revenue(signer, &claims, ClaimOptions::default())
            .await
        {
            Ok(result) => {
                tracing::info!(
                    claims = claims.len(),
                    tx_count = result.tx_hashes.len(),
                    "Batch claim submitted"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!(claims = claims.len(), error = %e, "Batch claim failed");
                Ok(ClaimResult::failed())
            }
        }
    }

    /// Claim one ancestor's revenue from its children
    ///
    /// Auto-transfer is always on; `unwrap` controls WIP unwrapping.
    pub async fn claim_from_child(
        &self,
        signer: &SignerKey,
        request: &ClaimRequest,
        unwrap: bool,
    ) -> Result<ClaimResult, RoyaltyError> {
        let claim = ResolvedClaim::resolve(request, &self.tokens)?;

        match self
            .client
            .claim_all_revenue(signer, &claim, ClaimOptions::with_unwrap(unwrap))
            .await
        {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::error!(ancestor = %claim.ancestor_ip_id, error = %e, "Claim failed");
                Ok(ClaimResult::failed())
            }
        }
    }

    /// Royalty vault contract of an IP
    pub async fn royalty_vault_address(&self, ip_id: &Address) -> Result<Address, RoyaltyError> {
        self.client.royalty_vault_address(ip_id).await
    }
}
