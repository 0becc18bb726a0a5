//! HTTP transport collaborator
//!
//! Providers never talk to reqwest directly; they go through the [`Fetcher`]
//! trait so that the scrape pipeline can be exercised against a stub
//! transport in tests. [`HttpFetcher`] is the production implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::REFERER;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::Result;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Per-request knobs the providers care about.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Base URL that relative request paths are joined against.
    pub base_url: Option<String>,
    /// Value for the `referer` header; upstreams use it to authorize hops.
    pub referer: Option<String>,
}

impl FetchOptions {
    #[must_use]
    pub fn with_base(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            referer: None,
        }
    }

    #[must_use]
    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }
}

/// Network primitives required by the scrape pipeline.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET a page and return its body as text.
    async fn fetch_text(&self, url: &str, opts: &FetchOptions) -> Result<String>;

    /// POST a structured query and parse the JSON reply.
    async fn fetch_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        opts: &FetchOptions,
    ) -> Result<serde_json::Value>;

    /// Issue a header-only request, transparently following any server
    /// redirects, and return the URL that was ultimately reached. The body
    /// is never read; only the destination matters.
    async fn resolve_final_url(&self, url: &str, opts: &FetchOptions) -> Result<String>;
}

/// Join a possibly relative request path against the options' base URL.
pub fn resolve_url(url: &str, opts: &FetchOptions) -> Result<Url> {
    match &opts.base_url {
        Some(base) => Ok(Url::parse(base)?.join(url)?),
        None => Ok(Url::parse(url)?),
    }
}

/// Production transport over a pooled reqwest client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with connection pooling, compression, and a bounded
    /// redirect policy.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .use_rustls_tls()
            .brotli(true)
            .gzip(true)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::limited(10))
            .cookie_store(true)
            .build()?;

        Ok(Self { client })
    }

    /// Get the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }

    fn apply_referer(
        req: reqwest::RequestBuilder,
        opts: &FetchOptions,
    ) -> reqwest::RequestBuilder {
        match &opts.referer {
            Some(referer) => req.header(REFERER, referer),
            None => req,
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str, opts: &FetchOptions) -> Result<String> {
        let target = resolve_url(url, opts)?;
        debug!(url = %target, "GET");
        let req = Self::apply_referer(self.client.get(target), opts);
        let resp = req.send().await?.error_for_status()?;
        Ok(resp.text().await?)
    }

    async fn fetch_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        opts: &FetchOptions,
    ) -> Result<serde_json::Value> {
        let target = resolve_url(url, opts)?;
        debug!(url = %target, "POST json");
        let req = Self::apply_referer(self.client.post(target), opts).json(body);
        let resp = req.send().await?.error_for_status()?;
        Ok(resp.json().await?)
    }

    async fn resolve_final_url(&self, url: &str, opts: &FetchOptions) -> Result<String> {
        let target = resolve_url(url, opts)?;
        debug!(url = %target, "HEAD (redirect probe)");
        // reqwest follows Location headers itself; the response URL is the
        // terminal hop. The body is intentionally never consumed.
        let req = Self::apply_referer(self.client.head(target), opts);
        let resp = req.send().await?;
        Ok(resp.url().as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_url_joins_relative_paths() {
        let opts = FetchOptions::with_base("https://example.com");
        let url = resolve_url("/rcp/abc123", &opts).unwrap();
        assert_eq!(url.as_str(), "https://example.com/rcp/abc123");
    }

    #[test]
    fn resolve_url_keeps_absolute_urls() {
        let opts = FetchOptions::with_base("https://example.com");
        let url = resolve_url("https://other.example/x", &opts).unwrap();
        assert_eq!(url.as_str(), "https://other.example/x");
    }

    #[test]
    fn resolve_url_without_base_requires_absolute() {
        let opts = FetchOptions::default();
        assert!(resolve_url("/relative/only", &opts).is_err());
        assert!(resolve_url("https://example.com/ok", &opts).is_ok());
    }

    #[test]
    fn options_builder_sets_referer() {
        let opts = FetchOptions::with_base("https://example.com").referer("https://ref.example");
        assert_eq!(opts.referer.as_deref(), Some("https://ref.example"));
    }

    #[test]
    fn http_fetcher_builds() {
        assert!(HttpFetcher::new().is_ok());
    }
}
