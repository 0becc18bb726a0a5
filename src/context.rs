//! Per-resolution scrape context
//!
//! Each resolution request gets its own [`ScrapeContext`]: a transport
//! handle, an advisory progress callback, and a cancellation flag shared
//! with the caller-held [`ResolutionHandle`]. Nothing in it is shared
//! across concurrent resolutions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, ScrapeError};
use crate::fetch::Fetcher;

type ProgressFn = dyn Fn(u8) + Send + Sync;

/// Caller-side handle for cancelling an in-flight resolution.
#[derive(Clone)]
pub struct ResolutionHandle {
    cancelled: Arc<AtomicBool>,
}

impl ResolutionHandle {
    /// Request cancellation. The resolution fails fast with
    /// [`ScrapeError::Cancelled`] before its next network call.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Collaborators and progress state for one resolution request.
pub struct ScrapeContext {
    fetcher: Arc<dyn Fetcher>,
    progress: Option<Box<ProgressFn>>,
    cancelled: Arc<AtomicBool>,
}

impl ScrapeContext {
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            progress: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attach a progress callback. Checkpoints are approximate percentages
    /// reported at well-defined milestones; advisory only.
    #[must_use]
    pub fn with_progress(mut self, progress: impl Fn(u8) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Handle the caller keeps to cancel this resolution.
    #[must_use]
    pub fn handle(&self) -> ResolutionHandle {
        ResolutionHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    #[must_use]
    pub fn fetcher(&self) -> &dyn Fetcher {
        self.fetcher.as_ref()
    }

    /// Fail fast if the caller cancelled. Providers call this before every
    /// network suspension point.
    pub fn ensure_active(&self) -> Result<()> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Err(ScrapeError::Cancelled);
        }
        Ok(())
    }

    /// Report a progress checkpoint.
    pub fn progress(&self, percent: u8) {
        debug!(percent, "progress checkpoint");
        if let Some(report) = &self.progress {
            report(percent);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::fetch::FetchOptions;

    struct NullFetcher;

    #[async_trait]
    impl Fetcher for NullFetcher {
        async fn fetch_text(&self, _url: &str, _opts: &FetchOptions) -> Result<String> {
            Ok(String::new())
        }

        async fn fetch_json(
            &self,
            _url: &str,
            _body: &serde_json::Value,
            _opts: &FetchOptions,
        ) -> Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }

        async fn resolve_final_url(&self, url: &str, _opts: &FetchOptions) -> Result<String> {
            Ok(url.to_string())
        }
    }

    #[test]
    fn context_starts_active() {
        let ctx = ScrapeContext::new(Arc::new(NullFetcher));
        assert!(ctx.ensure_active().is_ok());
        assert!(!ctx.handle().is_cancelled());
    }

    #[test]
    fn cancel_trips_ensure_active() {
        let ctx = ScrapeContext::new(Arc::new(NullFetcher));
        let handle = ctx.handle();
        handle.cancel();
        assert!(matches!(ctx.ensure_active(), Err(ScrapeError::Cancelled)));
        assert!(handle.is_cancelled());
    }

    #[test]
    fn progress_reaches_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let ctx = ScrapeContext::new(Arc::new(NullFetcher))
            .with_progress(move |pct| sink.lock().unwrap().push(pct));
        ctx.progress(33);
        ctx.progress(66);
        assert_eq!(*seen.lock().unwrap(), vec![33, 66]);
    }
}
