//! Scrape pipeline errors
//!
//! Every error here is fatal to the current resolution attempt: there is no
//! local recovery, partial-result fallback, or automatic retry in this crate.
//! Callers that want a stream anyway should fall back to a different
//! provider.

use thiserror::Error;

/// Errors surfaced by stream resolution.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("no search entry matching '{title}' ({year})")]
    NotFound { title: String, year: u16 },

    #[error("no episode marker for season {season} episode {episode}")]
    EpisodeNotFound { season: u16, episode: u16 },

    #[error("episode marker has no player page URL")]
    MissingStartUrl,

    #[error("failed to find encoded iframe source: {0}")]
    DecodeSource(String),

    #[error("unrecognized embed host: {0}")]
    UnrecognizedEmbed(String),

    #[error("resolution cancelled")]
    Cancelled,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("malformed upstream payload: {0}")]
    Payload(String),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
