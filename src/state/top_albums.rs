//! Top albums screen, including "mark as favorite".

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::flight::{completed, Completion, KeyedFlights, SingleFlight};
use super::{reached_page_end, StateChannel, START_PAGE};
use crate::db::{FavoriteAlbum, FavoriteAlbumDetails};
use crate::error::Result;
use crate::models::AlbumItem;
use crate::repository::Repository;

/// Matches Last.fm's default `artist.gettopalbums` page size.
pub const TOP_ALBUMS_PAGE_SIZE: usize = 50;

/// Snapshot of the top albums screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TopAlbumsState {
    pub is_loading: bool,
    pub is_error: bool,
    /// All albums loaded so far, page order preserved.
    pub albums: Vec<AlbumItem>,
    /// Last page appended to the list.
    pub page: u32,
    /// Page count reported by the first page.
    pub total_pages: u32,
    /// Set once the last "mark as favorite" was stored.
    pub is_favorite: bool,
}

impl Default for TopAlbumsState {
    fn default() -> Self {
        Self {
            is_loading: false,
            is_error: false,
            albums: Vec::new(),
            page: START_PAGE,
            total_pages: START_PAGE,
            is_favorite: false,
        }
    }
}

/// Holds the top albums screen state and runs its requests.
pub struct TopAlbumsViewModel {
    repository: Repository,
    state: StateChannel<TopAlbumsState>,
    scroll_position: AtomicUsize,
    page_debounce: Duration,
    load_flight: SingleFlight<String>,
    next_page_flight: SingleFlight<String>,
    favorite_flights: KeyedFlights<String>,
}

impl TopAlbumsViewModel {
    pub fn new(repository: Repository, page_debounce: Duration) -> Self {
        Self {
            repository,
            state: StateChannel::new(TopAlbumsState::default()),
            scroll_position: AtomicUsize::new(0),
            page_debounce,
            load_flight: SingleFlight::new(),
            next_page_flight: SingleFlight::new(),
            favorite_flights: KeyedFlights::new(),
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> TopAlbumsState {
        self.state.snapshot()
    }

    /// Receive every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<TopAlbumsState> {
        self.state.subscribe()
    }

    /// Load the first page of `artist`'s top albums, replacing the list.
    pub fn load(&self, artist: &str) -> Completion {
        let artist = artist.trim().to_string();
        if artist.is_empty() {
            return completed();
        }

        self.next_page_flight.cancel();
        self.state.update(|s| {
            s.is_loading = true;
            s.is_error = false;
        });

        let repository = self.repository.clone();
        let state = self.state.clone();
        self.load_flight.run(artist.clone(), async move {
            match repository.top_albums(&artist, START_PAGE).await {
                Ok(top) => state.update(|s| {
                    s.is_loading = false;
                    s.albums = top.album;
                    s.page = START_PAGE;
                    s.total_pages = u32::try_from(top.attr.total_pages).unwrap_or(u32::MAX);
                }),
                Err(_) => state.update(|s| {
                    s.is_loading = false;
                    s.is_error = true;
                }),
            }
        })
    }

    /// Fetch and append the next page once the user has scrolled to the end
    /// of the loaded albums and more pages exist. Otherwise does nothing, as
    /// it does while a base load is still running.
    ///
    /// `page` only advances once the fetched page has been appended.
    pub fn next_page(&self, artist: &str) -> Completion {
        if self.load_flight.is_running() {
            debug!("Base top albums still running, next page ignored");
            return completed();
        }

        let artist = artist.trim().to_string();
        let position = self.scroll_position.load(Ordering::SeqCst);
        let repository = self.repository.clone();
        let state = self.state.clone();
        let debounce = self.page_debounce;

        self.next_page_flight.run_if(artist.clone(), move || {
            let page = state.try_update(|s| {
                if s.page >= s.total_pages
                    || !reached_page_end(position, s.page, TOP_ALBUMS_PAGE_SIZE)
                {
                    return None;
                }
                s.is_loading = true;
                s.is_error = false;
                Some(s.page + 1)
            })?;
            debug!("Next top albums page triggered: {}", page);

            Some(async move {
                tokio::time::sleep(debounce).await;
                match repository.top_albums(&artist, page).await {
                    Ok(top) => state.update(|s| {
                        s.is_loading = false;
                        s.albums.extend(top.album);
                        s.page = page;
                    }),
                    Err(_) => state.update(|s| {
                        s.is_loading = false;
                        s.is_error = true;
                    }),
                }
            })
        })
    }

    /// Record the index of the last visible album.
    pub fn on_scroll_position_changed(&self, position: usize) {
        self.scroll_position.store(position, Ordering::SeqCst);
    }

    /// Fetch the album's details and store it as a favorite.
    ///
    /// Both the detail fetch and the store write report failure through
    /// `is_error`.
    ///
    /// Saves of different albums run side by side; saving an album whose save
    /// is still running joins that save.
    pub fn save_album_as_favorite(&self, favorite: FavoriteAlbum) -> Completion {
        let repository = self.repository.clone();
        let state = self.state.clone();

        self.favorite_flights.run_with(favorite.mbid.clone(), move || {
            state.update(|s| s.is_favorite = false);
            async move {
                let mbid = favorite.mbid.clone();
                match store_favorite(&repository, favorite).await {
                    Ok(()) => {
                        info!("Album {} saved as favorite", mbid);
                        state.update(|s| s.is_favorite = true);
                    }
                    Err(e) => {
                        warn!("Could not save favorite {}: {}", mbid, e);
                        state.update(|s| s.is_error = true);
                    }
                }
            }
        })
    }
}

async fn store_favorite(repository: &Repository, favorite: FavoriteAlbum) -> Result<()> {
    let album = repository
        .album_details(&favorite.artist_name, &favorite.album_name)
        .await?;

    let mut details = FavoriteAlbumDetails::from_album(&album);
    // Both rows must share a key even when album.getinfo omits the mbid.
    details.mbid = favorite.mbid.clone();
    if details.album_image_url.is_empty() {
        details.album_image_url = favorite.album_image_url.clone();
    }

    repository
        .save_favorite_album_with_details(favorite, details)
        .await
}
