//! Artist search screen.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use super::flight::{completed, Completion, SingleFlight};
use super::{reached_page_end, StateChannel, START_PAGE};
use crate::models::ArtistItem;
use crate::repository::Repository;

/// Matches Last.fm's default `artist.search` page size.
pub const ARTIST_SEARCH_PAGE_SIZE: usize = 30;

/// Snapshot of the search screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub is_loading: bool,
    pub is_error: bool,
    /// All matches loaded so far, page order preserved.
    pub artists: Vec<ArtistItem>,
    /// Last page appended to the list.
    pub page: u32,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            is_loading: false,
            is_error: false,
            artists: Vec::new(),
            page: START_PAGE,
        }
    }
}

/// Holds the search screen state and runs its requests.
pub struct SearchViewModel {
    repository: Repository,
    state: StateChannel<SearchState>,
    scroll_position: AtomicUsize,
    page_debounce: Duration,
    search_flight: SingleFlight<String>,
    next_page_flight: SingleFlight<String>,
}

impl SearchViewModel {
    pub fn new(repository: Repository, page_debounce: Duration) -> Self {
        Self {
            repository,
            state: StateChannel::new(SearchState::default()),
            scroll_position: AtomicUsize::new(0),
            page_debounce,
            search_flight: SingleFlight::new(),
            next_page_flight: SingleFlight::new(),
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> SearchState {
        self.state.snapshot()
    }

    /// Receive every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Search for `artist`, replacing the current results on success.
    ///
    /// A pending next-page fetch is cancelled so it cannot append stale
    /// matches to the new list.
    pub fn search(&self, artist: &str) -> Completion {
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
        self.search_flight.run(artist.clone(), async move {
            match repository.search_artists(&artist, START_PAGE).await {
                Ok(matches) => state.update(|s| {
                    s.is_loading = false;
                    s.artists = matches.artist;
                    s.page = START_PAGE;
                }),
                Err(_) => state.update(|s| {
                    s.is_loading = false;
                    s.is_error = true;
                }),
            }
        })
    }

    /// Fetch and append the next page once the user has scrolled to the end
    /// of the loaded matches. Otherwise does nothing, as it does while a base
    /// search is still running.
    ///
    /// `page` only advances once the fetched page has been appended.
    pub fn next_page(&self, artist: &str) -> Completion {
        if self.search_flight.is_running() {
            debug!("Base search still running, next page ignored");
            return completed();
        }

        let artist = artist.trim().to_string();
        let position = self.scroll_position.load(Ordering::SeqCst);
        let repository = self.repository.clone();
        let state = self.state.clone();
        let debounce = self.page_debounce;

        self.next_page_flight.run_if(artist.clone(), move || {
            let page = state.try_update(|s| {
                if !reached_page_end(position, s.page, ARTIST_SEARCH_PAGE_SIZE) {
                    return None;
                }
                s.is_loading = true;
                s.is_error = false;
                Some(s.page + 1)
            })?;
            debug!("Next search page triggered: {}", page);

            Some(async move {
                tokio::time::sleep(debounce).await;
                match repository.search_artists(&artist, page).await {
                    Ok(matches) => state.update(|s| {
                        s.is_loading = false;
                        s.artists.extend(matches.artist);
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

    /// Record the index of the last visible match.
    pub fn on_scroll_position_changed(&self, position: usize) {
        self.scroll_position.store(position, Ordering::SeqCst);
    }
}
