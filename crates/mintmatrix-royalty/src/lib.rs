//! Mint Matrix Royalty
//!
//! Revenue Claim Orchestrator over the on-chain royalty module.
//!
//! The orchestrator provides:
//! - Claimable revenue per IP and summed over many IPs (queried concurrently)
//! - Batched claims with fixed auto-transfer and auto-unwrap options
//! - Single-ancestor claims with a caller-chosen unwrap flag
//! - Royalty vault lookup
//!
//! Token choices are resolved to contract addresses through a
//! [`TokenRegistry`](mintmatrix_domain::TokenRegistry) built from
//! [`RoyaltyConfig`].
//!
//! # Examples
//!
//! ```
//! use mintmatrix_royalty::{MockRoyaltyClient, RevenueOrchestrator};
//! use mintmatrix_domain::TokenRegistry;
//! use std::sync::Arc;
//!
//! let orchestrator = RevenueOrchestrator::new(
//!     Arc::new(MockRoyaltyClient::new()),
//!     TokenRegistry::default(),
//! );
//! assert_eq!(orchestrator.tokens(), &TokenRegistry::default());
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod mock;
pub mod orchestrator;

pub use client::{ResolvedClaim, RoyaltyClient, SignerKey};
pub use config::RoyaltyConfig;
pub use error::RoyaltyError;
pub use gateway::{GatewayRoyaltyClient, SIGNER_KEY_HEADER};
pub use mock::{MockRoyaltyClient, RecordedClaim};
pub use orchestrator::{ClaimableRevenue, ClaimableTotal, RevenueOrchestrator};
