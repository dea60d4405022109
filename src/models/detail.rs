//! Album detail models (`album.getinfo`).

use serde::{Deserialize, Serialize};

use super::album::AlbumArtist;
use super::common::{
    image_url, lenient_u64, object_or_none, one_or_many, string_or_empty, ImageItem,
};

/// Top-level envelope of an `album.getinfo` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlbumDetailResponse {
    #[serde(default)]
    pub album: Option<DetailedAlbum>,
}

/// Full album information including the track list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DetailedAlbum {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,

    /// Artist name (a plain string in this method).
    #[serde(default, deserialize_with = "string_or_empty")]
    pub artist: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub mbid: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub url: String,

    #[serde(default, deserialize_with = "one_or_many")]
    pub image: Vec<ImageItem>,

    #[serde(default, deserialize_with = "lenient_u64")]
    pub listeners: u64,

    #[serde(default, deserialize_with = "lenient_u64")]
    pub playcount: u64,

    #[serde(default, deserialize_with = "object_or_none")]
    pub tracks: Option<Tracks>,

    #[serde(default, deserialize_with = "object_or_none")]
    pub tags: Option<Tags>,

    #[serde(default, deserialize_with = "object_or_none")]
    pub wiki: Option<Wiki>,
}

impl DetailedAlbum {
    /// Tracks in album order.
    pub fn track_list(&self) -> &[TrackItem] {
        self.tracks
            .as_ref()
            .map(|t| t.track.as_slice())
            .unwrap_or_default()
    }

    /// Number of tracks.
    pub fn track_count(&self) -> usize {
        self.track_list().len()
    }

    /// Sum of all track durations in seconds.
    pub fn total_duration(&self) -> u64 {
        self.track_list().iter().map(|t| t.duration).sum()
    }

    /// Tag names in the order Last.fm ranks them.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags
            .as_ref()
            .map(|t| t.tag.iter().map(|tag| tag.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// URL of the image variant with the given size label.
    pub fn image_url(&self, size: &str) -> Option<&str> {
        image_url(&self.image, size)
    }
}

/// Wrapper around the track list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Tracks {
    #[serde(default, deserialize_with = "one_or_many")]
    pub track: Vec<TrackItem>,
}

/// A track of a detailed album.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrackItem {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub url: String,

    /// Duration in seconds, 0 when unknown.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub duration: u64,

    #[serde(rename = "@attr", default)]
    pub attr: Option<TrackAttr>,

    #[serde(default)]
    pub artist: AlbumArtist,
}

impl TrackItem {
    /// Create a track with a name and duration in seconds.
    pub fn new<S: Into<String>>(name: S, duration: u64) -> Self {
        Self {
            name: name.into(),
            duration,
            ..Default::default()
        }
    }

    /// One-based position on the album, when Last.fm reports it.
    pub fn rank(&self) -> Option<u64> {
        self.attr.as_ref().map(|a| a.rank)
    }
}

/// Track attributes (`@attr`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackAttr {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub rank: u64,
}

/// Wrapper around the tag list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tags {
    #[serde(default, deserialize_with = "one_or_many")]
    pub tag: Vec<TagItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagItem {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub url: String,
}

/// Editorial text about the album.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Wiki {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub published: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub summary: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_album_info() {
        let body = json!({
            "album": {
                "artist": "Cher",
                "mbid": "63b3a8ca",
                "name": "Believe",
                "url": "https://www.last.fm/music/Cher/Believe",
                "listeners": "405893",
                "playcount": "2051381",
                "image": [ { "#text": "https://img/believe-l.png", "size": "large" } ],
                "tags": { "tag": [ { "name": "pop", "url": "https://www.last.fm/tag/pop" } ] },
                "tracks": {
                    "track": [
                        { "name": "Believe", "duration": 239, "url": "u1", "@attr": { "rank": 1 },
                          "artist": { "name": "Cher", "mbid": "bfcc6d75", "url": "a" } },
                        { "name": "The Power", "duration": null, "url": "u2", "@attr": { "rank": "2" },
                          "artist": { "name": "Cher", "url": "a" } }
                    ]
                },
                "wiki": { "published": "27 Jul 2008", "summary": "Short", "content": "Long" }
            }
        });

        let response: AlbumDetailResponse = serde_json::from_value(body).unwrap();
        let album = response.album.unwrap();
        assert_eq!(album.listeners, 405893);
        assert_eq!(album.track_count(), 2);
        assert_eq!(album.total_duration(), 239);
        assert_eq!(album.track_list()[1].rank(), Some(2));
        assert_eq!(album.tag_names(), vec!["pop"]);
        assert_eq!(album.wiki.unwrap().summary, "Short");
    }

    #[test]
    fn test_single_track_album_is_a_list() {
        let body = json!({
            "album": {
                "name": "Single",
                "artist": "Someone",
                "tracks": { "track": { "name": "Only Song", "duration": "180" } },
                "tags": ""
            }
        });

        let album = serde_json::from_value::<AlbumDetailResponse>(body)
            .unwrap()
            .album
            .unwrap();
        assert_eq!(album.track_count(), 1);
        assert_eq!(album.total_duration(), 180);
        assert!(album.tag_names().is_empty());
    }
}
