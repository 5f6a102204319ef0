//! HTTP request handlers for the Router service.
//!
//! Exposes relationship views, royalty operations and agent key management
//! over JSON using axum.

use crate::key_cache::KeyStore;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router as AxumRouter,
};
use mintmatrix_domain::{
    layout, Address, ClaimRequest, ClaimResult, Dispute, DisputeSummary, DomainError, FamilyLink,
    FamilyNode, IpRelationships, LicenseSummary, RoyaltyToken,
};
use mintmatrix_royalty::{ClaimableTotal, RevenueOrchestrator, RoyaltyError, SignerKey};
use mintmatrix_story::{StoryClient, StoryError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Story Protocol API client
    pub story: StoryClient,
    /// Royalty query and claim orchestration
    pub royalty: RevenueOrchestrator,
    /// Agent signer keys by wallet
    pub keys: Arc<dyn KeyStore>,
    /// Chain the router talks to, reported by `/health`
    pub chain: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Chain name
    pub chain: String,
}

/// Positioned family tree
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyTreeResponse {
    /// Asset at the center
    pub ip_id: String,
    /// Positioned nodes
    pub nodes: Vec<FamilyNode>,
    /// Links between node keys
    pub links: Vec<FamilyLink>,
}

/// Licensing overview
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicensingResponse {
    /// Asset summarized
    pub ip_id: String,
    /// Distinct templates and terms across its edges
    #[serde(flatten)]
    pub summary: LicenseSummary,
}

/// Dispute overview
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputesResponse {
    /// Asset summarized
    pub ip_id: String,
    /// Counts by status
    pub summary: DisputeSummary,
    /// Disputes as returned by the API
    pub disputes: Vec<Dispute>,
}

/// Claimable revenue query
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimableQuery {
    /// IPs to query
    pub ip_ids: Vec<String>,
    /// Receiver of the revenue
    pub claimer: String,
    /// Token name (`wip` or `merc20`); defaults to WIP
    #[serde(default)]
    pub token: Option<String>,
}

/// Batch claim request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchClaimBody {
    /// Wallet whose cached agent key signs the claim
    pub wallet: Address,
    /// Claims to submit together
    pub requests: Vec<ClaimRequest>,
}

/// Single-ancestor claim request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildClaimBody {
    /// Wallet whose cached agent key signs the claim
    pub wallet: Address,
    /// The claim
    pub request: ClaimRequest,
    /// Unwrap WIP after claiming (default: true)
    #[serde(default = "default_unwrap")]
    pub unwrap: bool,
}

fn default_unwrap() -> bool {
    true
}

/// Claim outcome
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    /// At least one transaction was submitted
    pub success: bool,
    /// Raw result
    #[serde(flatten)]
    pub result: ClaimResult,
}

/// Agent key registration
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterKeyRequest {
    /// Wallet the key signs for
    pub wallet: String,
    /// Signer private key
    pub private_key: String,
}

/// Agent key registration result
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterKeyResponse {
    /// Normalized wallet address
    pub wallet: String,
    /// Seconds until the key expires
    pub expires_in_secs: u64,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Underlying cause, for unexpected failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Malformed or invalid input
    BadRequest(String),
    /// No agent key cached for the wallet
    Unauthorized(String),
    /// Resource does not exist
    NotFound(String),
    /// Upstream or internal failure
    Internal {
        /// Summary
        error: String,
        /// Cause
        details: Option<String>,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::Internal { error, details } => {
                tracing::error!(%error, details = ?details, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, error, details)
            }
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<StoryError> for AppError {
    fn from(e: StoryError) -> Self {
        AppError::Internal {
            error: "Story Protocol API request failed".to_string(),
            details: Some(e.to_string()),
        }
    }
}

impl From<RoyaltyError> for AppError {
    fn from(e: RoyaltyError) -> Self {
        match e {
            RoyaltyError::Validation(msg) => AppError::BadRequest(msg),
            other => AppError::Internal {
                error: "Royalty operation failed".to_string(),
                details: Some(other.to_string()),
            },
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
        chain: state.chain.clone(),
    })
}

/// GET /api/ip/:ip_id/relationships
async fn relationships(
    State(state): State<AppState>,
    Path(ip_id): Path<String>,
) -> Result<Json<IpRelationships>, AppError> {
    let ip_id = Address::parse(&ip_id)?;
    Ok(Json(state.story.get_ip_relationships(ip_id.as_str()).await))
}

/// GET /api/ip/:ip_id/family-tree
async fn family_tree(
    State(state): State<AppState>,
    Path(ip_id): Path<String>,
) -> Result<Json<FamilyTreeResponse>, AppError> {
    let ip_id = Address::parse(&ip_id)?;
    let tree = state.story.get_family_tree(ip_id.as_str()).await;
    let graph = layout(&tree);

    Ok(Json(FamilyTreeResponse {
        ip_id: tree.ip_id,
        nodes: graph.nodes,
        links: graph.links,
    }))
}

/// GET /api/ip/:ip_id/licensing
async fn licensing(
    State(state): State<AppState>,
    Path(ip_id): Path<String>,
) -> Result<Json<LicensingResponse>, AppError> {
    let ip_id = Address::parse(&ip_id)?;
    let relationships = state.story.get_ip_relationships(ip_id.as_str()).await;

    Ok(Json(LicensingResponse {
        ip_id: ip_id.to_string(),
        summary: LicenseSummary::from_edges(&relationships.all_relationships),
    }))
}

/// GET /api/ip/:ip_id/disputes
async fn disputes(
    State(state): State<AppState>,
    Path(ip_id): Path<String>,
) -> Result<Json<DisputesResponse>, AppError> {
    let ip_id = Address::parse(&ip_id)?;
    let (summary, disputes) = state.story.dispute_summary(ip_id.as_str()).await?;

    Ok(Json(DisputesResponse {
        ip_id: ip_id.to_string(),
        summary,
        disputes,
    }))
}

/// GET /api/assets/:ip_id
async fn asset(
    State(state): State<AppState>,
    Path(ip_id): Path<String>,
) -> Result<Json<Option<Value>>, AppError> {
    let ip_id = Address::parse(&ip_id)?;
    Ok(Json(state.story.get_asset(ip_id.as_str()).await?))
}

/// GET /api/assets/:ip_id/metadata
async fn asset_metadata(
    State(state): State<AppState>,
    Path(ip_id): Path<String>,
) -> Result<Json<Option<Value>>, AppError> {
    let ip_id = Address::parse(&ip_id)?;
    Ok(Json(state.story.get_asset_metadata(ip_id.as_str()).await?))
}

/// POST /api/royalty/claimable
async fn claimable(
    State(state): State<AppState>,
    body: Result<Json<ClaimableQuery>, JsonRejection>,
) -> Result<Json<ClaimableTotal>, AppError> {
    let Json(query) = body?;
    if query.ip_ids.is_empty() {
        return Err(AppError::BadRequest("ipIds must not be empty".to_string()));
    }
    let ip_ids = query
        .ip_ids
        .iter()
        .map(|id| Address::parse(id))
        .collect::<Result<Vec<_>, _>>()?;
    let claimer = Address::parse(&query.claimer)?;
    let token = match query.token.as_deref() {
        Some(name) => name.parse::<RoyaltyToken>()?,
        None => RoyaltyToken::default(),
    };

    Ok(Json(
        state
            .royalty
            .total_claimable_revenue(&ip_ids, &claimer, token)
            .await,
    ))
}

fn signer_for(state: &AppState, wallet: &Address) -> Result<SignerKey, AppError> {
    state.keys.get(wallet).ok_or_else(|| {
        AppError::Unauthorized(format!("No active agent key for wallet {}", wallet))
    })
}

/// POST /api/royalty/claim
async fn claim(
    State(state): State<AppState>,
    body: Result<Json<BatchClaimBody>, JsonRejection>,
) -> Result<Json<ClaimResponse>, AppError> {
    let Json(body) = body?;
    let signer = signer_for(&state, &body.wallet)?;
    let result = state
        .royalty
        .batch_claim_all_revenue(&signer, &body.requests)
        .await?;

    Ok(Json(ClaimResponse {
        success: result.is_success(),
        result,
    }))
}

/// POST /api/royalty/claim-from-child
async fn claim_from_child(
    State(state): State<AppState>,
    body: Result<Json<ChildClaimBody>, JsonRejection>,
) -> Result<Json<ClaimResponse>, AppError> {
    let Json(body) = body?;
    let signer = signer_for(&state, &body.wallet)?;
    let result = state
        .royalty
        .claim_from_child(&signer, &body.request, body.unwrap)
        .await?;

    Ok(Json(ClaimResponse {
        success: result.is_success(),
        result,
    }))
}

/// GET /api/royalty/vault/:ip_id
async fn royalty_vault(
    State(state): State<AppState>,
    Path(ip_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let ip_id = Address::parse(&ip_id)?;
    let vault = state.royalty.royalty_vault_address(&ip_id).await?;
    Ok(Json(serde_json::json!({
        "ipId": ip_id,
        "vaultAddress": vault,
    })))
}

/// POST /api/agent/keys
async fn register_key(
    State(state): State<AppState>,
    body: Result<Json<RegisterKeyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterKeyResponse>), AppError> {
    let Json(body) = body?;
    let wallet = Address::parse(&body.wallet)?;
    let key = SignerKey::new(body.private_key)?;
    let ttl = state.keys.insert(wallet.clone(), key);

    Ok((
        StatusCode::CREATED,
        Json(RegisterKeyResponse {
            wallet: wallet.to_string(),
            expires_in_secs: ttl.as_secs(),
        }),
    ))
}

/// DELETE /api/agent/keys/:wallet
async fn invalidate_key(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> Result<StatusCode, AppError> {
    let wallet = Address::parse(&wallet)?;
    if state.keys.invalidate(&wallet) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("No agent key for wallet {}", wallet)))
    }
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/api/ip/:ip_id/relationships", get(relationships))
        .route("/api/ip/:ip_id/family-tree", get(family_tree))
        .route("/api/ip/:ip_id/licensing", get(licensing))
        .route("/api/ip/:ip_id/disputes", get(disputes))
        .route("/api/assets/:ip_id", get(asset))
        .route("/api/assets/:ip_id/metadata", get(asset_metadata))
        .route("/api/royalty/claimable", post(claimable))
        .route("/api/royalty/claim", post(claim))
        .route("/api/royalty/claim-from-child", post(claim_from_child))
        .route("/api/royalty/vault/:ip_id", get(royalty_vault))
        .route("/api/agent/keys", post(register_key))
        .route("/api/agent/keys/:wallet", delete(invalidate_key))
        .with_state(state)
}
