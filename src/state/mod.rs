//! View-state holders, one per screen.
//!
//! Each holder publishes an immutable snapshot of its screen through a
//! [`tokio::sync::watch`] channel. Every transition (start loading, settle
//! with data, settle with an error) is one atomic replacement of the
//! snapshot, so a subscriber never sees half of an update.
//!
//! Operations spawn their work on the tokio runtime and return a
//! [`Completion`]. Work for the same operation is single-flight: see
//! [`flight::SingleFlight`].

pub mod album_details;
pub mod favorites;
pub mod flight;
pub mod search;
pub mod top_albums;

use std::sync::Arc;

use tokio::sync::watch;

pub use album_details::{format_duration, AlbumDetailsState, AlbumDetailsViewModel};
pub use favorites::{FavoritesState, FavoritesViewModel};
pub use flight::{Completion, KeyedFlights, SingleFlight};
pub use search::{SearchState, SearchViewModel};
pub use top_albums::{TopAlbumsState, TopAlbumsViewModel};

/// First page index used by Last.fm.
pub const START_PAGE: u32 = 1;

/// Whether the scroll position is close enough to the end of the loaded
/// pages to ask for the next one.
pub fn reached_page_end(scroll_position: usize, page: u32, page_size: usize) -> bool {
    scroll_position + 1 >= page as usize * page_size
}

/// Sender side of a screen's state channel.
pub(crate) struct StateChannel<S> {
    tx: Arc<watch::Sender<S>>,
}

impl<S> Clone for StateChannel<S> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<S: Clone> StateChannel<S> {
    pub(crate) fn new(initial: S) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    pub(crate) fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Apply one transition and notify subscribers.
    pub(crate) fn update(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_modify(f);
    }

    /// Apply a transition only when `f` returns `Some`; subscribers are
    /// notified only in that case.
    pub(crate) fn try_update<R>(&self, f: impl FnOnce(&mut S) -> Option<R>) -> Option<R> {
        let mut out = None;
        self.tx.send_if_modified(|state| {
            out = f(state);
            out.is_some()
        });
        out
    }
}
