//! Source provider trait and registry
//!
//! A [`SourceProvider`] implements one upstream strategy for turning a
//! [`MediaQuery`] into playable output. The registry keeps the built-in
//! providers in rank order; when one fails, the caller moves on to the
//! next. No provider ever retries or recovers internally.

use async_trait::async_trait;

use crate::context::ScrapeContext;
use crate::error::Result;
use crate::media::{MediaQuery, SourceOutput};
use crate::providers::{SuperstreamProvider, VidsrcProvider};

/// One upstream resolution strategy.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Short stable identifier (e.g. `"superstream"`).
    fn id(&self) -> &'static str;

    /// Human-readable provider name.
    fn name(&self) -> &'static str;

    /// Priority rank; higher ranks are tried first.
    fn rank(&self) -> u32;

    /// Resolve the query into playable files or embed references.
    async fn scrape(&self, ctx: &ScrapeContext, query: &MediaQuery) -> Result<SourceOutput>;
}

/// Built-in providers, highest rank first.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn SourceProvider>>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        let mut providers: Vec<Box<dyn SourceProvider>> = vec![
            Box::new(SuperstreamProvider::new()),
            Box::new(VidsrcProvider::new()),
        ];
        providers.sort_by(|a, b| b.rank().cmp(&a.rank()));
        Self { providers }
    }

    /// Look up a provider by its id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&dyn SourceProvider> {
        self.providers
            .iter()
            .find(|p| p.id() == id)
            .map(AsRef::as_ref)
    }

    /// Providers in rank order, best first.
    pub fn iter(&self) -> impl Iterator<Item = &dyn SourceProvider> {
        self.providers.iter().map(AsRef::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
