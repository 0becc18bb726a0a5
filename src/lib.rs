//! `streamscout` - playable stream resolution for movies and show episodes
//!
//! # Features
//!
//! - **Superstream**: JSON search/download API, yields direct mp4 files
//!   keyed by quality tier
//! - **VidSrc**: HTML redirect-chain protocol (obfuscated payloads, hash
//!   walking, redirect interception), yields embed references
//! - **Pluggable transport**: providers talk to a [`Fetcher`] trait, so the
//!   whole pipeline runs against a stub in tests
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use streamscout::{HttpFetcher, MediaQuery, ProviderRegistry, ScrapeContext, SourceProvider};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let ctx = ScrapeContext::new(Arc::new(HttpFetcher::new()?));
//!     let query = MediaQuery::movie("Example", 2020, "550");
//!
//!     let registry = ProviderRegistry::new();
//!     for provider in registry.iter() {
//!         if let Ok(output) = provider.scrape(&ctx, &query).await {
//!             println!("{output:?}");
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod compare;
pub mod context;
pub mod error;
pub mod fetch;
pub mod media;
pub mod provider;
pub mod providers;

pub use context::{ResolutionHandle, ScrapeContext};
pub use error::{Result, ScrapeError};
pub use fetch::{FetchOptions, Fetcher, HttpFetcher};
pub use media::{
    FileKind, MediaKind, MediaQuery, Quality, QualityMap, ResolvedEmbed, SourceOutput, StreamFile,
};
pub use provider::{ProviderRegistry, SourceProvider};
pub use providers::{SuperstreamProvider, VidsrcProvider};

/// Version of streamscout
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
