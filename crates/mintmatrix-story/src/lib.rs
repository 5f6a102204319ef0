//! Mint Matrix Story Protocol client
//!
//! Read-only access to the Story Protocol REST API: the edge fetcher, the
//! relationship aggregator, dispute lookups and asset/license pass-throughs.
//!
//! # Architecture
//!
//! - [`StoryTransport`] sends one request. [`HttpTransport`] does it over
//!   reqwest; [`MockTransport`] answers in-memory for tests.
//! - [`RetryPolicy`] decides how many times a read is attempted and how long
//!   to wait in between. It is injected, never hardcoded.
//! - [`Paginator`] walks cursor-paged list endpoints up to a cap.
//!
//! # Examples
//!
//! ```
//! use mintmatrix_story::{MockTransport, RetryPolicy, StoryClient, StoryConfig};
//! use mintmatrix_domain::EdgeFilter;
//! use std::sync::Arc;
//!
//! # tokio_test_block(async {
//! let transport = MockTransport::always_status(404);
//! let client = StoryClient::with_transport(
//!     Arc::new(transport),
//!     &StoryConfig::default(),
//!     RetryPolicy::immediate(3),
//! );
//! let edges = client.fetch_edges(&EdgeFilter::by_child("0xabc")).await;
//! assert!(edges.is_empty());
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]

pub mod assets;
pub mod client;
pub mod config;
pub mod disputes;
pub mod edges;
pub mod error;
pub mod mock;
pub mod paginate;
pub mod relationships;
pub mod retry;
pub mod transport;

pub use client::StoryClient;
pub use config::StoryConfig;
pub use error::StoryError;
pub use mock::MockTransport;
pub use paginate::{Page, PageOptions, PageRequest, Paginator};
pub use retry::{Backoff, RetryConfig, RetryPolicy};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, StoryTransport};
