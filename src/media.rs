//! Media query and stream descriptor types
//!
//! A [`MediaQuery`] goes in, a [`SourceOutput`] comes out: either a map of
//! directly playable files keyed by quality tier, or an ordered list of
//! embed references for downstream embed handlers.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// What kind of media is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    Show { season: u16, episode: u16 },
}

/// Immutable input to a resolution request.
#[derive(Debug, Clone)]
pub struct MediaQuery {
    /// Human-readable title, matched fuzzily against search results.
    pub title: String,
    /// Release year, matched exactly.
    pub release_year: u16,
    /// TMDB identifier; the HTML strategy keys its player pages on it.
    pub tmdb_id: String,
    pub kind: MediaKind,
}

impl MediaQuery {
    #[must_use]
    pub fn movie(title: impl Into<String>, release_year: u16, tmdb_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            release_year,
            tmdb_id: tmdb_id.into(),
            kind: MediaKind::Movie,
        }
    }

    #[must_use]
    pub fn show(
        title: impl Into<String>,
        release_year: u16,
        tmdb_id: impl Into<String>,
        season: u16,
        episode: u16,
    ) -> Self {
        Self {
            title: title.into(),
            release_year,
            tmdb_id: tmdb_id.into(),
            kind: MediaKind::Show { season, episode },
        }
    }
}

/// Supported quality tiers. The allow-list is closed: a [`QualityMap`] cannot
/// hold a tier outside this enum by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Quality {
    #[serde(rename = "360")]
    Q360,
    #[serde(rename = "480")]
    Q480,
    #[serde(rename = "720")]
    Q720,
    #[serde(rename = "1080")]
    Q1080,
}

impl Quality {
    /// All tiers, lowest first. Selection iterates this order.
    pub const ALL: [Quality; 4] = [Quality::Q360, Quality::Q480, Quality::Q720, Quality::Q1080];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Quality::Q360 => "360",
            Quality::Q480 => "480",
            Quality::Q720 => "720",
            Quality::Q1080 => "1080",
        }
    }

    /// Parse an upstream quality label, tolerating the trailing `p` unit
    /// suffix (`"720p"` and `"720"` both map to [`Quality::Q720`]).
    /// Labels outside the allow-list yield `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let stripped = label.strip_suffix('p').unwrap_or(label);
        Quality::ALL.into_iter().find(|q| q.label() == stripped)
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Container format of a directly playable file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileKind {
    #[serde(rename = "mp4")]
    Mp4,
}

/// One directly playable file at one quality tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamFile {
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub url: String,
}

impl StreamFile {
    #[must_use]
    pub fn mp4(url: impl Into<String>) -> Self {
        Self {
            kind: FileKind::Mp4,
            url: url.into(),
        }
    }
}

/// Playable files keyed by quality tier. Tiers the upstream did not supply
/// are simply absent; consumers index by tier.
pub type QualityMap = BTreeMap<Quality, StreamFile>;

/// A classified embed reference for a downstream handler. Only successfully
/// classified sources become entries; there is no "unknown handler" state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEmbed {
    /// Stable identifier of a known embed handler.
    pub embed_id: String,
    /// The terminal embed URL discovered behind the redirect chain.
    pub url: String,
    /// Extra request headers the handler must send (e.g. a `referer` the
    /// embed host checks).
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

/// What a provider hands to the stream-aggregation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOutput {
    /// Directly playable files, one per available quality tier.
    Files(QualityMap),
    /// Embed references in listing-page order.
    Embeds(Vec<ResolvedEmbed>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_from_label_strips_unit_suffix() {
        assert_eq!(Quality::from_label("720p"), Some(Quality::Q720));
        assert_eq!(Quality::from_label("720"), Some(Quality::Q720));
        assert_eq!(Quality::from_label("1080p"), Some(Quality::Q1080));
    }

    #[test]
    fn quality_from_label_rejects_off_list_tiers() {
        assert_eq!(Quality::from_label("1440p"), None);
        assert_eq!(Quality::from_label("4k"), None);
        assert_eq!(Quality::from_label(""), None);
        assert_eq!(Quality::from_label("p"), None);
    }

    #[test]
    fn quality_map_orders_by_tier() {
        let mut map = QualityMap::new();
        map.insert(Quality::Q1080, StreamFile::mp4("u2"));
        map.insert(Quality::Q360, StreamFile::mp4("u1"));
        let tiers: Vec<_> = map.keys().copied().collect();
        assert_eq!(tiers, vec![Quality::Q360, Quality::Q1080]);
    }

    #[test]
    fn stream_file_serializes_with_mp4_tag() {
        let json = serde_json::to_value(StreamFile::mp4("https://cdn.example/v.mp4")).unwrap();
        assert_eq!(json["type"], "mp4");
        assert_eq!(json["url"], "https://cdn.example/v.mp4");
    }

    #[test]
    fn quality_map_serializes_with_tier_keys() {
        let mut map = QualityMap::new();
        map.insert(Quality::Q720, StreamFile::mp4("u1"));
        let json = serde_json::to_value(&map).unwrap();
        assert!(json.get("720").is_some());
    }
}
