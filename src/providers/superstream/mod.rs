//! Superstream provider
//!
//! JSON search/download strategy: search the upstream catalog for the exact
//! title + release year, then query the download endpoint for a list of
//! directly playable files and keep the allow-listed quality tiers.

mod qualities;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::compare::titles_match;
use crate::context::ScrapeContext;
use crate::error::{Result, ScrapeError};
use crate::fetch::FetchOptions;
use crate::media::{MediaKind, MediaQuery, SourceOutput};
use crate::provider::SourceProvider;

const API_URL: &str = "https://showbox.shegu.net/api/api_client/index/";

/// Upstream wraps every reply in a `data` envelope.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    data: T,
}

/// Ids arrive as numbers or strings depending on the endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiId {
    Num(u64),
    Str(String),
}

impl std::fmt::Display for ApiId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiId::Num(n) => write!(f, "{n}"),
            ApiId::Str(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    id: ApiId,
    title: String,
    #[serde(default)]
    year: Option<u16>,
}

pub struct SuperstreamProvider;

impl SuperstreamProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// SEARCH state: find the catalog entry whose title fuzzy-matches and
    /// whose year matches exactly. First hit wins.
    async fn search(&self, ctx: &ScrapeContext, query: &MediaQuery) -> Result<String> {
        let search_query = json!({
            "module": "Search3",
            "page": "1",
            "type": "all",
            "keyword": query.title,
            "pagelimit": "20",
        });

        ctx.ensure_active()?;
        let raw = ctx
            .fetcher()
            .fetch_json(API_URL, &search_query, &FetchOptions::default())
            .await?;
        let reply: ApiEnvelope<Vec<SearchEntry>> =
            serde_json::from_value(raw).map_err(|e| ScrapeError::Payload(e.to_string()))?;
        ctx.progress(33);

        let entry = reply
            .data
            .iter()
            .find(|res| {
                titles_match(&res.title, &query.title) && res.year == Some(query.release_year)
            })
            .ok_or_else(|| ScrapeError::NotFound {
                title: query.title.clone(),
                year: query.release_year,
            })?;

        debug!(id = %entry.id, title = %entry.title, "matched search entry");
        Ok(entry.id.to_string())
    }
}

impl Default for SuperstreamProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceProvider for SuperstreamProvider {
    fn id(&self) -> &'static str {
        "superstream"
    }

    fn name(&self) -> &'static str {
        "Superstream"
    }

    fn rank(&self) -> u32 {
        300
    }

    async fn scrape(&self, ctx: &ScrapeContext, query: &MediaQuery) -> Result<SourceOutput> {
        // RESOLVE state: build the download query for the matched entry and
        // extract its quality map.
        let media_id = self.search(ctx, query).await?;

        let api_query = match query.kind {
            MediaKind::Movie => json!({
                "uid": "",
                "module": "Movie_downloadurl_v3",
                "mid": media_id,
                "oss": "1",
                "group": "",
            }),
            MediaKind::Show { season, episode } => json!({
                "uid": "",
                "module": "TV_downloadurl_v3",
                "tid": media_id,
                "season": season,
                "episode": episode,
                "oss": "1",
                "group": "",
            }),
        };

        let map = qualities::fetch_stream_qualities(ctx, &api_query).await?;
        Ok(SourceOutput::Files(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_id_renders_numbers_and_strings() {
        let id: ApiId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(id.to_string(), "42");
        let id: ApiId = serde_json::from_value(json!("abc")).unwrap();
        assert_eq!(id.to_string(), "abc");
    }

    #[test]
    fn search_entries_tolerate_missing_year() {
        let entry: SearchEntry =
            serde_json::from_value(json!({"id": 7, "title": "Example"})).unwrap();
        assert_eq!(entry.year, None);
    }
}
