//! Top-album models (`artist.gettopalbums`).

use serde::{Deserialize, Serialize};

use super::common::{image_url, lenient_u64, one_or_many, string_or_empty, ImageItem};

/// Top-level envelope of an `artist.gettopalbums` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TopAlbumsResponse {
    #[serde(default)]
    pub topalbums: Option<TopAlbums>,
}

/// One page of an artist's top albums.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TopAlbums {
    /// Albums on this page, most played first.
    #[serde(default, deserialize_with = "one_or_many")]
    pub album: Vec<AlbumItem>,

    /// Paging information.
    #[serde(rename = "@attr", default)]
    pub attr: TopAlbumsAttr,
}

/// Paging attributes attached to a top-albums page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopAlbumsAttr {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub artist: String,

    #[serde(default, deserialize_with = "lenient_u64")]
    pub page: u64,

    #[serde(rename = "perPage", default, deserialize_with = "lenient_u64")]
    pub per_page: u64,

    #[serde(rename = "totalPages", default, deserialize_with = "lenient_u64")]
    pub total_pages: u64,

    #[serde(default, deserialize_with = "lenient_u64")]
    pub total: u64,
}

/// Artist reference nested in an album.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlbumArtist {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub mbid: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub url: String,
}

/// An album as listed in an artist's top albums.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlbumItem {
    /// Album title.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,

    /// MusicBrainz identifier, used as the favorites key.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub mbid: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub url: String,

    /// Total scrobbles.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub playcount: u64,

    #[serde(default)]
    pub artist: AlbumArtist,

    #[serde(default, deserialize_with = "one_or_many")]
    pub image: Vec<ImageItem>,
}

impl AlbumItem {
    /// URL of the image variant with the given size label.
    pub fn image_url(&self, size: &str) -> Option<&str> {
        image_url(&self.image, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_top_albums() {
        let body = json!({
            "topalbums": {
                "album": [
                    {
                        "name": "Believe",
                        "playcount": 2051381,
                        "mbid": "63b3a8ca-26f2-4e2b-b867-647a6ec2bebd",
                        "url": "https://www.last.fm/music/Cher/Believe",
                        "artist": { "name": "Cher", "mbid": "bfcc6d75", "url": "https://www.last.fm/music/Cher" },
                        "image": [ { "#text": "https://img/believe.png", "size": "large" } ]
                    },
                    {
                        "name": "Greatest Hits",
                        "playcount": "1000",
                        "url": "https://www.last.fm/music/Cher/Greatest+Hits",
                        "artist": { "name": "Cher", "url": "https://www.last.fm/music/Cher" },
                        "image": []
                    }
                ],
                "@attr": { "artist": "Cher", "page": "1", "perPage": "50", "totalPages": "3", "total": "129" }
            }
        });

        let response: TopAlbumsResponse = serde_json::from_value(body).unwrap();
        let top = response.topalbums.unwrap();
        assert_eq!(top.attr.total_pages, 3);
        assert_eq!(top.attr.per_page, 50);
        assert_eq!(top.album.len(), 2);
        assert_eq!(top.album[0].playcount, 2051381);
        assert_eq!(top.album[1].playcount, 1000);
        assert_eq!(top.album[1].mbid, "");
        assert_eq!(top.album[0].image_url("large"), Some("https://img/believe.png"));
    }
}
