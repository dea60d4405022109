//! Rows stored in the favorites database.

use serde::{Deserialize, Serialize};

use crate::models::{image_size, AlbumItem, DetailedAlbum};

/// An album the user marked as favorite, as shown in the favorites list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteAlbum {
    /// Album identifier from Last.fm; primary key.
    pub mbid: String,
    pub album_image_url: String,
    pub album_name: String,
    pub artist_name: String,
    pub play_count: u64,
}

impl FavoriteAlbum {
    /// Build a favorite from a top-albums entry, using the large cover.
    ///
    /// Many Last.fm albums carry no mbid; those are keyed by
    /// `artist/album` instead so they do not overwrite each other.
    pub fn from_album_item(album: &AlbumItem) -> Self {
        let mbid = if album.mbid.is_empty() {
            format!("{}/{}", album.artist.name, album.name)
        } else {
            album.mbid.clone()
        };

        Self {
            mbid,
            album_image_url: album
                .image_url(image_size::LARGE)
                .unwrap_or_default()
                .to_string(),
            album_name: album.name.clone(),
            artist_name: album.artist.name.clone(),
            play_count: album.playcount,
        }
    }
}

/// Detail record of a favorite album, kept for offline viewing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteAlbumDetails {
    /// Album identifier from Last.fm; primary key.
    pub mbid: String,
    pub album_image_url: String,
    pub album_name: String,
    pub artist_name: String,
    pub total_tracks: u64,
    /// Sum of track durations in seconds.
    pub total_duration: u64,
    pub tracks: Vec<FavoriteTrack>,
}

impl FavoriteAlbumDetails {
    /// Snapshot a detailed album for storage.
    pub fn from_album(album: &DetailedAlbum) -> Self {
        let tracks: Vec<FavoriteTrack> = album
            .track_list()
            .iter()
            .enumerate()
            .map(|(i, track)| FavoriteTrack {
                position: track.rank().unwrap_or(i as u64 + 1),
                name: track.name.clone(),
                duration: track.duration,
            })
            .collect();

        Self {
            mbid: album.mbid.clone(),
            album_image_url: album
                .image_url(image_size::LARGE)
                .unwrap_or_default()
                .to_string(),
            album_name: album.name.clone(),
            artist_name: album.artist.clone(),
            total_tracks: tracks.len() as u64,
            total_duration: album.total_duration(),
            tracks,
        }
    }
}

/// A track inside [`FavoriteAlbumDetails`], serialized as JSON in its row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoriteTrack {
    /// One-based position on the album.
    pub position: u64,
    pub name: String,
    /// Duration in seconds.
    pub duration: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlbumArtist, ImageItem, TrackItem, Tracks};

    #[test]
    fn test_favorite_from_album_item() {
        let item = AlbumItem {
            name: "Believe".to_string(),
            mbid: "63b3a8ca".to_string(),
            playcount: 99,
            artist: AlbumArtist {
                name: "Cher".to_string(),
                ..Default::default()
            },
            image: vec![
                ImageItem::new("https://img/s.png", "small"),
                ImageItem::new("https://img/l.png", "large"),
            ],
            ..Default::default()
        };

        let favorite = FavoriteAlbum::from_album_item(&item);
        assert_eq!(favorite.mbid, "63b3a8ca");
        assert_eq!(favorite.album_image_url, "https://img/l.png");
        assert_eq!(favorite.artist_name, "Cher");
        assert_eq!(favorite.play_count, 99);
    }

    #[test]
    fn test_favorite_without_mbid_gets_name_key() {
        let item = AlbumItem {
            name: "Greatest Hits".to_string(),
            artist: AlbumArtist {
                name: "Cher".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(FavoriteAlbum::from_album_item(&item).mbid, "Cher/Greatest Hits");
    }

    #[test]
    fn test_details_from_album_sums_tracks() {
        let album = DetailedAlbum {
            name: "Believe".to_string(),
            artist: "Cher".to_string(),
            mbid: "63b3a8ca".to_string(),
            tracks: Some(Tracks {
                track: vec![TrackItem::new("Believe", 239), TrackItem::new("The Power", 236)],
            }),
            ..Default::default()
        };

        let details = FavoriteAlbumDetails::from_album(&album);
        assert_eq!(details.total_tracks, 2);
        assert_eq!(details.total_duration, 475);
        assert_eq!(details.album_image_url, "");
        assert_eq!(details.tracks[1].position, 2);
        assert_eq!(details.tracks[1].name, "The Power");
    }
}
