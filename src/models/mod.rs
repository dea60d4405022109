//! Data models for Last.fm API responses.
//!
//! These mirror the JSON the web service returns for the three methods the
//! organizer uses: artist search, an artist's top albums, and album info.

pub mod album;
pub mod artist;
pub mod common;
pub mod detail;

// Re-exports for convenience
pub use album::{AlbumArtist, AlbumItem, TopAlbums, TopAlbumsAttr, TopAlbumsResponse};
pub use artist::{ArtistItem, ArtistMatches, ArtistSearchResponse, Results};
pub use common::{image_size, image_url, ImageItem};
pub use detail::{AlbumDetailResponse, DetailedAlbum, TagItem, Tags, TrackAttr, TrackItem, Tracks, Wiki};
