//! Embed host classification.
//!
//! The redirect chain terminates on a small, known set of embed hosts. The
//! partition is closed on purpose: hosts we can hand to an embed handler,
//! hosts we deliberately skip, and everything else. The last bucket is a
//! hard error rather than a silently dead link.

use std::collections::HashMap;

use url::Url;

use crate::error::{Result, ScrapeError};
use crate::media::ResolvedEmbed;

/// Handler id for the vidsrc player embed.
pub const VIDSRC_EMBED_ID: &str = "vidsrcembed";
/// Handler id for the streambucket embed.
pub const STREAMBUCKET_EMBED_ID: &str = "streambucket";

/// Outcome of classifying a resolved embed URL's host.
#[derive(Debug, PartialEq, Eq)]
pub enum EmbedTarget {
    /// A known handler takes it from here.
    Handled {
        embed_id: &'static str,
        headers: HashMap<String, String>,
    },
    /// Deliberately skipped; produces no output entry and no error.
    Ignored,
    /// Not in the table. The walker turns this into a hard failure.
    Unknown,
}

/// Classify a host. `rcp_url` is the redirect-control page that produced
/// this hop; the vidsrc player checks it as referer.
#[must_use]
pub fn classify_host(host: &str, rcp_url: &str) -> EmbedTarget {
    match host {
        "vidsrc.stream" => EmbedTarget::Handled {
            embed_id: VIDSRC_EMBED_ID,
            headers: HashMap::from([("referer".to_string(), rcp_url.to_string())]),
        },
        "streambucket.net" => EmbedTarget::Handled {
            embed_id: STREAMBUCKET_EMBED_ID,
            headers: HashMap::new(),
        },
        // Re-aggregates sources this same protocol already reaches.
        "2embed.cc" | "www.2embed.cc" => EmbedTarget::Ignored,
        // Streams over a custom WebSocket transport we do not speak.
        "player-cdn.com" => EmbedTarget::Ignored,
        _ => EmbedTarget::Unknown,
    }
}

/// Classify a final URL into an embed entry, `None` for ignored hosts, or
/// [`ScrapeError::UnrecognizedEmbed`] for anything off the table.
pub fn classify(final_url: &str, rcp_url: &str) -> Result<Option<ResolvedEmbed>> {
    let parsed = Url::parse(final_url)?;
    let host = parsed.host_str().unwrap_or("");

    match classify_host(host, rcp_url) {
        EmbedTarget::Handled { embed_id, headers } => Ok(Some(ResolvedEmbed {
            embed_id: embed_id.to_string(),
            url: final_url.to_string(),
            headers,
        })),
        EmbedTarget::Ignored => Ok(None),
        EmbedTarget::Unknown => Err(ScrapeError::UnrecognizedEmbed(final_url.to_string())),
    }
}
