//! Mint Matrix Domain Layer
//!
//! Core data model for IP asset relationships on Story Protocol. Everything in
//! this crate is pure: no network, no clock, no global state. The Story API
//! client, the royalty orchestrator and the HTTP router all build on these
//! types.
//!
//! ## Key Concepts
//!
//! - **IP Asset**: an intellectual-property registration recorded on-chain,
//!   identified by its `ipId` (an [`Address`])
//! - **Edge**: an immutable parent -> child derivation record ([`IpEdge`])
//! - **Relationships**: the per-asset view of its parent and child edges
//! - **Royalty token**: the closed set of ERC-20 tokens revenue can be
//!   claimed in ([`RoyaltyToken`])
//! - **Family tree**: edges positioned on a fixed-band canvas for rendering
//!
//! ## Architecture
//!
//! Views (family tree, licensing summary, dispute summary) are derived from
//! edge arrays on demand. Nothing here caches or mutates edges.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod claim;
pub mod edge;
pub mod error;
pub mod family;
pub mod filter;
pub mod summary;
pub mod token;

// Re-exports for convenience
pub use address::Address;
pub use claim::{ClaimOptions, ClaimRequest, ClaimResult, ClaimedToken};
pub use edge::{IpEdge, IpRelationships};
pub use error::DomainError;
pub use family::{layout, FamilyGraph, FamilyLink, FamilyNode, FamilyRole, FamilyTree};
pub use filter::EdgeFilter;
pub use summary::{Dispute, DisputeStatus, DisputeSummary, LicenseSummary};
pub use token::{RoyaltyToken, TokenAmount, TokenRegistry};
