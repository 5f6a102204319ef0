//! Scripted royalty client for tests

use crate::client::{ResolvedClaim, RoyaltyClient, SignerKey};
use crate::RoyaltyError;
use async_trait::async_trait;
use mintmatrix_domain::{Address, ClaimOptions, ClaimResult, TokenAmount};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A claim submission the mock received
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedClaim {
    /// Claims in the submission
    pub claims: Vec<ResolvedClaim>,
    /// Options the submission carried
    pub options: ClaimOptions,
    /// Whether the batched entry point was used
    pub batched: bool,
}

#[derive(Default)]
struct MockState {
    claimable: HashMap<Address, Result<TokenAmount, RoyaltyError>>,
    claim_outcome: Option<Result<ClaimResult, RoyaltyError>>,
    vaults: HashMap<Address, Address>,
    claims: Vec<RecordedClaim>,
    claimable_queries: usize,
}

/// In-memory [`RoyaltyClient`]
///
/// Unknown IPs have zero claimable revenue. Claims succeed with
/// `ClaimResult::default()` unless an outcome was configured.
#[derive(Clone, Default)]
pub struct MockRoyaltyClient {
    state: Arc<Mutex<MockState>>,
}

impl MockRoyaltyClient {
    /// Empty mock
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state(&self, f: impl FnOnce(&mut MockState)) {
        if let Ok(mut state) = self.state.lock() {
            f(&mut state);
        }
    }

    /// Claimable amount for an IP
    pub fn set_claimable(&self, ip_id: Address, amount: TokenAmount) {
        self.with_state(|s| {
            s.claimable.insert(ip_id, Ok(amount));
        });
    }

    /// Make the claimable query for an IP fail
    pub fn fail_claimable(&self, ip_id: Address, error: RoyaltyError) {
        self.with_state(|s| {
            s.claimable.insert(ip_id, Err(error));
        });
    }

    /// Outcome of every claim submission
    pub fn set_claim_outcome(&self, outcome: Result<ClaimResult, RoyaltyError>) {
        self.with_state(|s| s.claim_outcome = Some(outcome));
    }

    /// Vault address for an IP
    pub fn set_vault(&self, ip_id: Address, vault: Address) {
        self.with_state(|s| {
            s.vaults.insert(ip_id, vault);
        });
    }

    /// Claim submissions received so far
    pub fn recorded_claims(&self) -> Vec<RecordedClaim> {
        self.state
            .lock()
            .map(|s| s.claims.clone())
            .unwrap_or_default()
    }

    /// Number of claimable-revenue queries received
    pub fn claimable_queries(&self) -> usize {
        self.state.lock().map(|s| s.claimable_queries).unwrap_or(0)
    }

    fn record(
        &self,
        claims: Vec<ResolvedClaim>,
        options: ClaimOptions,
        batched: bool,
    ) -> Result<ClaimResult, RoyaltyError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| RoyaltyError::Communication(e.to_string()))?;
        state.claims.push(RecordedClaim {
            claims,
            options,
            batched,
        });
        state
            .claim_outcome
            .clone()
            .unwrap_or_else(|| Ok(ClaimResult::default()))
    }
}

#[async_trait]
impl RoyaltyClient for MockRoyaltyClient {
    async fn claimable_revenue(
        &self,
        ip_id: &Address,
        _claimer: &Address,
        _token: &Address,
    ) -> Result<TokenAmount, RoyaltyError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| RoyaltyError::Communication(e.to_string()))?;
        state.claimable_queries += 1;
        state
            .claimable
            .get(ip_id)
            .cloned()
            .unwrap_or(Ok(TokenAmount::ZERO))
    }

    async fn batch_claim_all_revenue(
        &self,
        _signer: &SignerKey,
        claims: &[ResolvedClaim],
        options: ClaimOptions,
    ) -> Result<ClaimResult, RoyaltyError> {
        self.record(claims.to_vec(), options, true)
    }

    async fn claim_all_revenue(
        &self,
        _signer: &SignerKey,
        claim: &ResolvedClaim,
        options: ClaimOptions,
    ) -> Result<ClaimResult, RoyaltyError> {
        self.record(vec![claim.clone()], options, false)
    }

    async fn royalty_vault_address(&self, ip_id: &Address) -> Result<Address, RoyaltyError> {
        self.state
            .lock()
            .map_err(|e| RoyaltyError::Communication(e.to_string()))?
            .vaults
            .get(ip_id)
            .cloned()
            .ok_or_else(|| RoyaltyError::Status {
                status: 404,
                body: format!("no vault for {}", ip_id),
            })
    }
}
