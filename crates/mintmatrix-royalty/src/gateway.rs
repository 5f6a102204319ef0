//! Signer gateway client
//!
//! Reaches the on-chain royalty module through an HTTP gateway that holds
//! the chain SDK. Claims carry the signer key in a header; reads are
//! unauthenticated. Nothing here retries: a claim is submitted at most once.

use crate::client::{ResolvedClaim, RoyaltyClient, SignerKey};
use crate::{RoyaltyConfig, RoyaltyError};
use async_trait::async_trait;
use mintmatrix_domain::{Address, ClaimOptions, ClaimResult, TokenAmount};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Header carrying the signer key
pub const SIGNER_KEY_HEADER: &str = "X-Signer-Key";

#[derive(Deserialize)]
struct ClaimableResponse {
    amount: TokenAmount,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VaultResponse {
    vault_address: String,
}

/// [`RoyaltyClient`] over the signer gateway's JSON API
pub struct GatewayRoyaltyClient {
    base_url: String,
    client: reqwest::Client,
}

impl GatewayRoyaltyClient {
    /// Build a client from configuration
    pub fn new(config: &RoyaltyConfig) -> Result<Self, RoyaltyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.gateway_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
        signer: Option<&SignerKey>,
    ) -> Result<T, RoyaltyError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.post(&url).json(&body);
        if let Some(signer) = signer {
            request = request.header(SIGNER_KEY_HEADER, signer.expose());
        }
        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RoyaltyError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RoyaltyError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl RoyaltyClient for GatewayRoyaltyClient {
    async fn claimable_revenue(
        &self,
        ip_id: &Address,
        claimer: &Address,
        token: &Address,
    ) -> Result<TokenAmount, RoyaltyError> {
        let body = json!({
            "royaltyVaultIpId": ip_id,
            "claimer": claimer,
            "token": token,
        });
        let response: ClaimableResponse = self
            .post("/royalty/claimable-revenue", body, None)
            .await?;
        Ok(response.amount)
    }

    async fn batch_claim_all_revenue(
        &self,
        signer: &SignerKey,
        claims: &[ResolvedClaim],
        options: ClaimOptions,
    ) -> Result<ClaimResult, RoyaltyError> {
        let body = json!({
            "ancestorIps": claims,
            "claimOptions": options,
        });
        self.post("/royalty/batch-claim-all-revenue", body, Some(signer))
            .await
    }

    async fn claim_all_revenue(
        &self,
        signer: &SignerKey,
        claim: &ResolvedClaim,
        options: ClaimOptions,
    ) -> Result<ClaimResult, RoyaltyError> {
        let mut body = serde_json::to_value(claim)?;
        body["claimOptions"] = serde_json::to_value(options)?;
        self.post("/royalty/claim-all-revenue", body, Some(signer))
            .await
    }

    async fn royalty_vault_address(&self, ip_id: &Address) -> Result<Address, RoyaltyError> {
        let url = format!("{}/royalty/vault/{}", self.base_url, ip_id);
        let response = self.client.get(&url).send().await?;
        let vault: VaultResponse = Self::decode(response).await?;
        Address::parse(&vault.vault_address)
            .map_err(|e| RoyaltyError::InvalidResponse(e.to_string()))
    }
}
