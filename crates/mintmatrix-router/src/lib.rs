//! Mint Matrix Router
//!
//! HTTP surface over the Story Protocol relationship views and the revenue
//! claim orchestrator. Holds agent signer keys in a TTL cache so claims can
//! be made on a wallet's behalf.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod key_cache;

use config::RouterConfig;
use handlers::{create_router, AppState};
use key_cache::{spawn_purge_task, TtlKeyStore};
use mintmatrix_royalty::{GatewayRoyaltyClient, RevenueOrchestrator, RoyaltyError};
use mintmatrix_story::{StoryClient, StoryError};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Router error
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Story Protocol client could not be built
    #[error("Story client error: {0}")]
    Story(#[from] StoryError),

    /// Royalty client could not be built
    #[error("Royalty client error: {0}")]
    Royalty(#[from] RoyaltyError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build application state from configuration
///
/// Wires the HTTP Story client with the configured retry policy, the signer
/// gateway behind the orchestrator, and an in-process key cache.
pub fn build_state(config: &RouterConfig) -> Result<AppState, RouterError> {
    let story = StoryClient::new(&config.story, config.retry.to_policy())?;
    let gateway = GatewayRoyaltyClient::new(&config.royalty)?;
    let royalty = RevenueOrchestrator::new(Arc::new(gateway), config.royalty.token_registry()?);
    let keys = TtlKeyStore::new(Duration::from_secs(config.agent_keys.ttl_secs));

    Ok(AppState {
        story,
        royalty,
        keys: Arc::new(keys),
        chain: config.story.chain.clone(),
    })
}

/// Start the Router HTTP server
///
/// Initializes logging, builds state, starts the key sweep, and serves until
/// the process stops.
pub async fn start_server(config: RouterConfig) -> Result<(), RouterError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Mint Matrix Router");
    info!("Bind address: {}", config.bind_addr());
    info!("Story API: {} (chain {})", config.story.api_base_url, config.story.chain);
    info!("API key configured: {}", config.story.api_key.is_some());
    info!("Agent key TTL: {} seconds", config.agent_keys.ttl_secs);

    let state = build_state(&config)?;
    spawn_purge_task(
        state.keys.clone(),
        Duration::from_secs(config.agent_keys.purge_interval_secs),
    );
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Router listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| RouterError::Server(e.to_string()))?;

    Ok(())
}
