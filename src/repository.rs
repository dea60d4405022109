//! Single access point for remote reads and local favorites.
//!
//! Remote reads are wrapped in the bounded retry from [`crate::retry`] and
//! unwrapped from their response envelope. Favorite writes are handed to the
//! store exactly once, without retry.

use std::sync::Arc;

use tracing::debug;

use crate::api::LastFmService;
use crate::db::{FavoriteAlbum, FavoriteAlbumDetails, FavoriteAlbumsDao};
use crate::error::{OrganizerError, Result};
use crate::models::{ArtistMatches, DetailedAlbum, TopAlbums};
use crate::retry::{retry_with_delay, RetryPolicy};

/// Composes the Last.fm service and the favorites store.
#[derive(Clone)]
pub struct Repository {
    service: Arc<dyn LastFmService>,
    favorites: Arc<dyn FavoriteAlbumsDao>,
    retry: RetryPolicy,
}

impl Repository {
    /// Create a repository.
    pub fn new(
        service: Arc<dyn LastFmService>,
        favorites: Arc<dyn FavoriteAlbumsDao>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            service,
            favorites,
            retry,
        }
    }

    /// One page of artist search matches.
    pub async fn search_artists(&self, artist: &str, page: u32) -> Result<ArtistMatches> {
        retry_with_delay(self.retry, "artist search", || async move {
            self.service
                .search_artists(artist, page)
                .await?
                .results
                .and_then(|r| r.artistmatches)
                .ok_or(OrganizerError::MissingField("results.artistmatches"))
        })
        .await
    }

    /// One page of an artist's top albums, with paging attributes.
    pub async fn top_albums(&self, artist: &str, page: u32) -> Result<TopAlbums> {
        retry_with_delay(self.retry, "top albums", || async move {
            self.service
                .top_albums(artist, page)
                .await?
                .topalbums
                .ok_or(OrganizerError::MissingField("topalbums"))
        })
        .await
    }

    /// Full details of one album.
    pub async fn album_details(&self, artist: &str, album: &str) -> Result<DetailedAlbum> {
        retry_with_delay(self.retry, "album details", || async move {
            self.service
                .album_details(artist, album)
                .await?
                .album
                .ok_or(OrganizerError::MissingField("album"))
        })
        .await
    }

    /// Store a favorites-list row.
    pub async fn save_favorite_album(&self, album: FavoriteAlbum) -> Result<()> {
        let favorites = Arc::clone(&self.favorites);
        debug!("Saving favorite album {}", album.mbid);
        tokio::task::spawn_blocking(move || favorites.save_favorite_album(&album)).await?
    }

    /// Store a favorite together with its detail snapshot.
    pub async fn save_favorite_album_with_details(
        &self,
        album: FavoriteAlbum,
        details: FavoriteAlbumDetails,
    ) -> Result<()> {
        let favorites = Arc::clone(&self.favorites);
        debug!("Saving favorite album {} with details", album.mbid);
        tokio::task::spawn_blocking(move || favorites.save_favorite_with_details(&album, &details))
            .await?
    }

    /// All stored favorites.
    pub async fn favorite_albums(&self) -> Result<Vec<FavoriteAlbum>> {
        let favorites = Arc::clone(&self.favorites);
        tokio::task::spawn_blocking(move || favorites.all_favorite_albums()).await?
    }

    /// Stored detail snapshot of one favorite.
    pub async fn favorite_album_details(&self, mbid: &str) -> Result<Option<FavoriteAlbumDetails>> {
        let favorites = Arc::clone(&self.favorites);
        let mbid = mbid.to_string();
        tokio::task::spawn_blocking(move || favorites.favorite_album_details(&mbid)).await?
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted fakes for the service and the store.

    use std::collections::VecDeque;
    use std::io;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;
    use crate::models::{
        AlbumDetailResponse, AlbumItem, ArtistItem, ArtistSearchResponse, Results, TopAlbumsAttr,
        TopAlbumsResponse,
    };

    #[derive(Clone)]
    enum Reply<T> {
        Ok(T),
        IoError,
    }

    /// Replies for one endpoint, consumed front to back. Once the queue is
    /// empty the last reply is repeated.
    pub struct Script<T> {
        replies: Mutex<VecDeque<Reply<T>>>,
        last: Mutex<Option<Reply<T>>>,
        calls: Mutex<Vec<(String, Instant)>>,
    }

    impl<T: Clone> Script<T> {
        fn new() -> Self {
            Self {
                replies: Mutex::new(VecDeque::new()),
                last: Mutex::new(None),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn push_ok(&self, value: T) {
            self.replies.lock().unwrap().push_back(Reply::Ok(value));
        }

        pub fn push_io_error(&self) {
            self.replies.lock().unwrap().push_back(Reply::IoError);
        }

        pub fn calls(&self) -> Vec<(String, Instant)> {
            self.calls.lock().unwrap().clone()
        }

        fn next(&self, call: String) -> Result<T> {
            self.calls.lock().unwrap().push((call, Instant::now()));
            let mut last = self.last.lock().unwrap();
            let reply = self.replies.lock().unwrap().pop_front().or_else(|| last.clone());
            *last = reply.clone();
            match reply {
                Some(Reply::Ok(value)) => Ok(value),
                Some(Reply::IoError) => {
                    Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset").into())
                }
                None => Err(OrganizerError::MissingField("no scripted reply")),
            }
        }
    }

    pub struct FakeLastFm {
        pub search: Script<ArtistSearchResponse>,
        pub top: Script<TopAlbumsResponse>,
        pub details: Script<AlbumDetailResponse>,
    }

    impl FakeLastFm {
        pub fn new() -> Self {
            Self {
                search: Script::new(),
                top: Script::new(),
                details: Script::new(),
            }
        }
    }

    #[async_trait]
    impl LastFmService for FakeLastFm {
        async fn search_artists(&self, artist: &str, page: u32) -> Result<ArtistSearchResponse> {
            self.search.next(format!("{}#{}", artist, page))
        }

        async fn top_albums(&self, artist: &str, page: u32) -> Result<TopAlbumsResponse> {
            self.top.next(format!("{}#{}", artist, page))
        }

        async fn album_details(&self, artist: &str, album: &str) -> Result<AlbumDetailResponse> {
            self.details.next(format!("{}/{}", artist, album))
        }
    }

    /// Store fake that records every write and can be told to fail.
    #[derive(Default)]
    pub struct RecordingDao {
        pub albums: Mutex<Vec<FavoriteAlbum>>,
        pub details: Mutex<Vec<FavoriteAlbumDetails>>,
        pub fail_writes: std::sync::atomic::AtomicBool,
    }

    impl RecordingDao {
        fn check(&self) -> Result<()> {
            if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
                Err(io::Error::new(io::ErrorKind::Other, "disk full").into())
            } else {
                Ok(())
            }
        }
    }

    impl FavoriteAlbumsDao for RecordingDao {
        fn save_favorite_album(&self, album: &FavoriteAlbum) -> Result<()> {
            self.albums.lock().unwrap().push(album.clone());
            self.check()
        }

        fn save_favorite_album_details(&self, details: &FavoriteAlbumDetails) -> Result<()> {
            self.details.lock().unwrap().push(details.clone());
            self.check()
        }

        fn all_favorite_albums(&self) -> Result<Vec<FavoriteAlbum>> {
            self.check()?;
            Ok(self.albums.lock().unwrap().clone())
        }

        fn favorite_album_details(&self, mbid: &str) -> Result<Option<FavoriteAlbumDetails>> {
            self.check()?;
            Ok(self
                .details
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|d| d.mbid == mbid)
                .cloned())
        }
    }

    pub fn search_page(names: &[&str]) -> ArtistSearchResponse {
        ArtistSearchResponse {
            results: Some(Results {
                artistmatches: Some(ArtistMatches {
                    artist: names
                        .iter()
                        .map(|n| ArtistItem::new(*n, format!("https://{}.com", n)))
                        .collect(),
                }),
                ..Default::default()
            }),
        }
    }

    pub fn top_page(names: &[&str], page: u64, total_pages: u64) -> TopAlbumsResponse {
        TopAlbumsResponse {
            topalbums: Some(TopAlbums {
                album: names
                    .iter()
                    .map(|n| AlbumItem {
                        name: n.to_string(),
                        mbid: format!("mbid-{}", n),
                        playcount: 1,
                        ..Default::default()
                    })
                    .collect(),
                attr: TopAlbumsAttr {
                    page,
                    per_page: 50,
                    total_pages,
                    ..Default::default()
                },
            }),
        }
    }

    pub fn repository(service: Arc<FakeLastFm>, dao: Arc<RecordingDao>) -> Repository {
        Repository::new(service, dao, RetryPolicy::default())
    }
}
