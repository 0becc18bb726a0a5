//! Hash-chain walker.
//!
//! The listing page stores opaque source hashes in the HTML. For each hash
//! the upstream serves a redirect-control page ("RCP") whose obfuscated
//! payload decodes to the next hop; a header-only request to that hop gets
//! 302-bounced to the real embed URL. Slow, but that is the protocol.

use scraper::{Html, Selector};
use tracing::debug;

use crate::context::ScrapeContext;
use crate::error::{Result, ScrapeError};
use crate::fetch::FetchOptions;
use crate::media::ResolvedEmbed;

use super::decode::{decode_src, normalize_redirect_url};
use super::embed;
use super::{VIDSRC_BASE, VIDSRC_RCP_BASE};

/// Pull every source hash out of a listing page, in document order.
/// Duplicates are kept; each hash is probed independently.
fn extract_source_hashes(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(".source[data-hash]").unwrap();

    document
        .select(&selector)
        .filter_map(|el| el.value().attr("data-hash"))
        .map(ToString::to_string)
        .collect()
}

/// Extract the obfuscated payload and seed from an RCP page. Both are
/// required; a page without them cannot be decoded.
fn extract_decode_inputs(html: &str) -> Result<(String, String)> {
    let document = Html::parse_document(html);
    let hidden_selector = Selector::parse("#hidden").unwrap();
    let body_selector = Selector::parse("body").unwrap();

    let encoded = document
        .select(&hidden_selector)
        .next()
        .and_then(|el| el.value().attr("data-h"));
    let seed = document
        .select(&body_selector)
        .next()
        .and_then(|el| el.value().attr("data-i"));

    match (encoded, seed) {
        (Some(encoded), Some(seed)) if !seed.is_empty() => {
            Ok((encoded.to_string(), seed.to_string()))
        }
        _ => Err(ScrapeError::DecodeSource(
            "RCP page has no encoded payload or seed".into(),
        )),
    }
}

/// Locate the listing-page URL for one (season, episode) pair. The show
/// player page lists every episode of every season; the real listing URL
/// hangs off the matching episode marker.
pub(super) fn find_episode_listing_url(html: &str, season: u16, episode: u16) -> Result<String> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse(&format!(r#".ep[data-s="{season}"][data-e="{episode}"]"#)).unwrap();

    let marker = document
        .select(&selector)
        .next()
        .ok_or(ScrapeError::EpisodeNotFound { season, episode })?;

    marker
        .value()
        .attr("data-iframe")
        .map(ToString::to_string)
        .ok_or(ScrapeError::MissingStartUrl)
}

/// Referer for RCP fetches: the absolute URL of the listing page.
fn listing_referer(starting_url: &str) -> String {
    if starting_url.starts_with("http") {
        starting_url.to_string()
    } else {
        format!("{VIDSRC_BASE}{starting_url}")
    }
}

/// Walk every source hash on the listing page and collect the classified
/// embeds, preserving listing order. Ignored hosts are skipped silently;
/// a missing decode key or an unrecognized host aborts the whole walk.
pub(super) async fn walk_source_hashes(
    ctx: &ScrapeContext,
    starting_url: &str,
) -> Result<Vec<ResolvedEmbed>> {
    ctx.ensure_active()?;
    let listing_html = ctx
        .fetcher()
        .fetch_text(starting_url, &FetchOptions::with_base(VIDSRC_BASE))
        .await?;

    let hashes = extract_source_hashes(&listing_html);
    debug!(count = hashes.len(), "collected source hashes");

    let referer = listing_referer(starting_url);
    let mut embeds = Vec::new();

    for hash in hashes {
        ctx.ensure_active()?;
        let rcp_html = ctx
            .fetcher()
            .fetch_text(
                &format!("/rcp/{hash}"),
                &FetchOptions::with_base(VIDSRC_RCP_BASE).referer(referer.clone()),
            )
            .await?;

        let (encoded, seed) = extract_decode_inputs(&rcp_html)?;
        let redirect_url = normalize_redirect_url(decode_src(&encoded, &seed)?);

        // The next hop 302s to the real embed. The RCP page that produced
        // this hash must be the referer or the upstream refuses the hop.
        let rcp_url = format!("{VIDSRC_RCP_BASE}/rcp/{hash}");
        ctx.ensure_active()?;
        let final_url = ctx
            .fetcher()
            .resolve_final_url(
                &redirect_url,
                &FetchOptions::default().referer(rcp_url.clone()),
            )
            .await?;

        match embed::classify(&final_url, &rcp_url)? {
            Some(resolved) => {
                debug!(embed_id = %resolved.embed_id, url = %resolved.url, "classified embed");
                embeds.push(resolved);
            }
            None => debug!(url = %final_url, "ignored embed host"),
        }
    }

    Ok(embeds)
}
