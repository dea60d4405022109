//! Artist search models (`artist.search`).

use serde::{Deserialize, Serialize};

use super::common::{lenient_u64, one_or_many, string_or_empty, ImageItem};

/// Top-level envelope of an `artist.search` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtistSearchResponse {
    #[serde(default)]
    pub results: Option<Results>,
}

/// The `results` object of a search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Results {
    /// Matching artists for the requested page.
    #[serde(default)]
    pub artistmatches: Option<ArtistMatches>,

    /// Total number of matches across all pages.
    #[serde(
        rename = "opensearch:totalResults",
        default,
        deserialize_with = "lenient_u64"
    )]
    pub total_results: u64,

    /// Page size used by the server.
    #[serde(
        rename = "opensearch:itemsPerPage",
        default,
        deserialize_with = "lenient_u64"
    )]
    pub items_per_page: u64,

    /// Zero-based index of the first match on this page.
    #[serde(
        rename = "opensearch:startIndex",
        default,
        deserialize_with = "lenient_u64"
    )]
    pub start_index: u64,
}

/// List of artists matching a search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtistMatches {
    #[serde(default, deserialize_with = "one_or_many")]
    pub artist: Vec<ArtistItem>,
}

/// A single search hit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtistItem {
    /// Display name.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,

    /// MusicBrainz identifier, often empty.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub mbid: String,

    /// Number of distinct listeners.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub listeners: u64,

    /// Streamable flag as reported ("0"/"1").
    #[serde(default, deserialize_with = "string_or_empty")]
    pub streamable: String,

    /// Last.fm info page.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub url: String,

    /// Image variants.
    #[serde(default, deserialize_with = "one_or_many")]
    pub image: Vec<ImageItem>,
}

impl ArtistItem {
    /// Create a hit with a name and info URL.
    pub fn new<S1: Into<String>, S2: Into<String>>(name: S1, url: S2) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Default::default()
        }
    }
}
