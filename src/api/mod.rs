//! Last.fm web service access.
//!
//! [`LastFmService`] describes the three endpoints the organizer consumes;
//! [`LastFmApi`] is the HTTP implementation. The repository only sees the
//! trait, so tests can swap in scripted fakes.

pub mod lastfm;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AlbumDetailResponse, ArtistSearchResponse, TopAlbumsResponse};

pub use lastfm::LastFmApi;

/// `method` value for artist search.
pub const SEARCH_METHOD: &str = "artist.search";
/// `method` value for an artist's top albums.
pub const TOP_ALBUMS_METHOD: &str = "artist.gettopalbums";
/// `method` value for album details.
pub const ALBUM_INFO_METHOD: &str = "album.getinfo";

/// The Last.fm endpoints used by the organizer.
#[async_trait]
pub trait LastFmService: Send + Sync {
    /// Search artists by name. `page` is one-based.
    async fn search_artists(&self, artist: &str, page: u32) -> Result<ArtistSearchResponse>;

    /// An artist's most played albums. `page` is one-based.
    async fn top_albums(&self, artist: &str, page: u32) -> Result<TopAlbumsResponse>;

    /// Full information about one album, including its tracks.
    async fn album_details(&self, artist: &str, album: &str) -> Result<AlbumDetailResponse>;
}
