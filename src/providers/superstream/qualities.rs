//! Quality-list extraction for the download endpoint.

use serde::Deserialize;

use crate::context::ScrapeContext;
use crate::error::{Result, ScrapeError};
use crate::fetch::FetchOptions;
use crate::media::{Quality, QualityMap, StreamFile};

use super::{ApiEnvelope, API_URL};

#[derive(Debug, Deserialize)]
struct DownloadReply {
    list: Vec<DownloadFile>,
}

#[derive(Debug, Deserialize)]
struct DownloadFile {
    path: String,
    real_quality: String,
}

/// Fetch the download list and build the quality map: allow-listed tiers
/// only, first upstream entry wins when a tier appears twice, absent tiers
/// are simply missing.
pub(super) async fn fetch_stream_qualities(
    ctx: &ScrapeContext,
    api_query: &serde_json::Value,
) -> Result<QualityMap> {
    ctx.ensure_active()?;
    let raw = ctx
        .fetcher()
        .fetch_json(API_URL, api_query, &FetchOptions::default())
        .await?;
    let reply: ApiEnvelope<DownloadReply> =
        serde_json::from_value(raw).map_err(|e| ScrapeError::Payload(e.to_string()))?;
    ctx.progress(66);

    let candidates: Vec<(Quality, &str)> = reply
        .data
        .list
        .iter()
        .filter_map(|file| {
            Quality::from_label(&file.real_quality).map(|q| (q, file.path.as_str()))
        })
        .collect();

    let mut map = QualityMap::new();
    for quality in Quality::ALL {
        if let Some((_, url)) = candidates.iter().find(|(q, _)| *q == quality) {
            map.insert(quality, StreamFile::mp4(*url));
        }
    }

    Ok(map)
}
