//! VidSrc provider
//!
//! HTML redirect-chain strategy: scrape opaque source hashes from the
//! player listing page, decode each hash's redirect-control page, follow
//! the server-issued redirect, and classify the terminal embed URL.

mod decode;
mod embed;
mod scrape;

pub use embed::{classify_host, EmbedTarget, STREAMBUCKET_EMBED_ID, VIDSRC_EMBED_ID};

use async_trait::async_trait;

use crate::context::ScrapeContext;
use crate::error::Result;
use crate::fetch::FetchOptions;
use crate::media::{MediaKind, MediaQuery, SourceOutput};
use crate::provider::SourceProvider;

const VIDSRC_BASE: &str = "https://vidsrc.me";
const VIDSRC_RCP_BASE: &str = "https://rcp.vidsrc.me";

pub struct VidsrcProvider;

impl VidsrcProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// The show player page defaults to season 1 episode 1 regardless of
    /// the URL, but it embeds markers for every episode of every season.
    /// The real listing URL has to be read off the matching marker first.
    async fn show_listing_url(
        &self,
        ctx: &ScrapeContext,
        tmdb_id: &str,
        season: u16,
        episode: u16,
    ) -> Result<String> {
        ctx.ensure_active()?;
        let html = ctx
            .fetcher()
            .fetch_text(
                &format!("/embed/{tmdb_id}"),
                &FetchOptions::with_base(VIDSRC_BASE),
            )
            .await?;
        scrape::find_episode_listing_url(&html, season, episode)
    }
}

impl Default for VidsrcProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceProvider for VidsrcProvider {
    fn id(&self) -> &'static str {
        "vidsrc"
    }

    fn name(&self) -> &'static str {
        "VidSrc"
    }

    fn rank(&self) -> u32 {
        120
    }

    async fn scrape(&self, ctx: &ScrapeContext, query: &MediaQuery) -> Result<SourceOutput> {
        let starting_url = match query.kind {
            MediaKind::Movie => format!("/embed/{}", query.tmdb_id),
            MediaKind::Show { season, episode } => {
                self.show_listing_url(ctx, &query.tmdb_id, season, episode)
                    .await?
            }
        };

        let embeds = scrape::walk_source_hashes(ctx, &starting_url).await?;
        Ok(SourceOutput::Embeds(embeds))
    }
}
