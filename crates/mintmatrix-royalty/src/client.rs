//! Royalty client seam
//!
//! The on-chain royalty module is reached through [`RoyaltyClient`]. Token
//! choices have already been resolved to contract addresses by the time a
//! call crosses this seam.

use crate::RoyaltyError;
use async_trait::async_trait;
use mintmatrix_domain::{Address, ClaimOptions, ClaimRequest, ClaimResult, TokenAmount, TokenRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Private key used to sign claim transactions for one wallet
///
/// Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignerKey(String);

impl SignerKey {
    /// Wrap a raw key; blank keys are rejected
    pub fn new(raw: impl Into<String>) -> Result<Self, RoyaltyError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(RoyaltyError::Validation("signer key is empty".to_string()));
        }
        Ok(Self(raw))
    }

    /// Raw key material
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SignerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SignerKey(***)")
    }
}

/// A claim with its token resolved to a contract address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedClaim {
    /// IP whose vault is claimed from
    pub ancestor_ip_id: Address,
    /// Receiver of the revenue
    pub claimer: Address,
    /// Children to pull revenue up from
    pub child_ip_ids: Vec<Address>,
    /// Royalty policy per child
    pub royalty_policies: Vec<Address>,
    /// Token contracts to claim
    pub currency_tokens: Vec<Address>,
}

impl ResolvedClaim {
    /// Validate `request` and resolve its token through `tokens`
    pub fn resolve(request: &ClaimRequest, tokens: &TokenRegistry) -> Result<Self, RoyaltyError> {
        request.validate()?;
        Ok(Self {
            ancestor_ip_id: request.ancestor_ip_id.clone(),
            claimer: request.claimer.clone(),
            child_ip_ids: request.child_ip_ids.clone(),
            royalty_policies: request.royalty_policies.clone(),
            currency_tokens: vec![tokens.address(request.token).clone()],
        })
    }
}

/// Operations of the on-chain royalty module
#[async_trait]
pub trait RoyaltyClient: Send + Sync {
    /// Revenue `claimer` can pull from `ip_id`'s vault in `token`
    async fn claimable_revenue(
        &self,
        ip_id: &Address,
        claimer: &Address,
        token: &Address,
    ) -> Result<TokenAmount, RoyaltyError>;

    /// Claim across several ancestors in one batched submission
    async fn batch_claim_all_revenue(
        &self,
        signer: &SignerKey,
        claims: &[ResolvedClaim],
        options: ClaimOptions,
    ) -> Result<ClaimResult, RoyaltyError>;

    /// Claim for a single ancestor
    async fn claim_all_revenue(
        &self,
        signer: &SignerKey,
        claim: &ResolvedClaim,
        options: ClaimOptions,
    ) -> Result<ClaimResult, RoyaltyError>;

    /// Royalty vault contract of `ip_id`
    async fn royalty_vault_address(&self, ip_id: &Address) -> Result<Address, RoyaltyError>;
}
