// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # J-Quants API Client
//!
//! Typed access to the J-Quants v2 market data API: the equities master and
//! financial statement summaries.
//!
//! ## Features
//!
//! - **Retrying Requests**: Fixed throttle, `Retry-After` aware 429 handling,
//!   bounded retry budget
//! - **Cursor Pagination**: Follows `pagination_key` and never returns a
//!   truncated result
//! - **Lookup Cache**: Bounded LRU cache for single-security lookups
//! - **Pluggable Transport**: Swap reqwest for a scripted transport in tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jquants_client::{ClientConfig, JQuantsClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = JQuantsClient::new(ClientConfig::from_env()?)?;
//!
//!     let toyota = client.fetch_master_record("72030", None).await?;
//!     let master = client.fetch_all_master_records(Some("2024-01-05")).await?;
//!     let statements = client.fetch_statements(Some("72030"), None).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        JQuantsClient                        │
//! │  fetch_master_record   fetch_all_master_records   fetch_... │
//! └─────────────────────────────────────────────────────────────┘
//!          │ LruCache                 │
//!          │                  ┌───────┴───────┐
//!          │                  │   Paginator   │ pagination_key
//!          │                  └───────┬───────┘
//! ┌────────┴──────────────────────────┴─────────────────────────┐
//! │                     RetryingRequester                       │
//! │  throttle → Transport::get → RetryPolicy::decide → sleep    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// Retrying HTTP request layer
pub mod http;

/// Cursor pagination
pub mod pagination;

/// Bounded LRU cache
pub mod cache;

/// Date parameter handling
pub mod dates;

/// Endpoint adapters
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::JQuantsClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use types::{AggregatedResult, Page, Record};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
