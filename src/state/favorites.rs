//! Favorites screen.

use tokio::sync::watch;
use tracing::warn;

use super::flight::{Completion, SingleFlight};
use super::StateChannel;
use crate::db::{FavoriteAlbum, FavoriteAlbumDetails};
use crate::repository::Repository;

/// Snapshot of the favorites screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesState {
    pub is_loading: bool,
    pub is_error: bool,
    pub albums: Vec<FavoriteAlbum>,
    /// Detail record of the favorite opened last.
    pub selected: Option<FavoriteAlbumDetails>,
}

/// Holds the favorites screen state.
pub struct FavoritesViewModel {
    repository: Repository,
    state: StateChannel<FavoritesState>,
    list_flight: SingleFlight<()>,
    details_flight: SingleFlight<String>,
}

impl FavoritesViewModel {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            state: StateChannel::new(FavoritesState::default()),
            list_flight: SingleFlight::new(),
            details_flight: SingleFlight::new(),
        }
    }

    pub fn state(&self) -> FavoritesState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<FavoritesState> {
        self.state.subscribe()
    }

    /// Read all favorites from the store.
    pub fn load(&self) -> Completion {
        self.state.update(|s| {
            s.is_loading = true;
            s.is_error = false;
        });

        let repository = self.repository.clone();
        let state = self.state.clone();
        self.list_flight.run((), async move {
            match repository.favorite_albums().await {
                Ok(albums) => state.update(|s| {
                    s.is_loading = false;
                    s.albums = albums;
                }),
                Err(e) => {
                    warn!("Could not read favorites: {}", e);
                    state.update(|s| {
                        s.is_loading = false;
                        s.is_error = true;
                    })
                }
            }
        })
    }

    /// Read the stored detail record of one favorite into `selected`.
    pub fn open(&self, mbid: &str) -> Completion {
        let mbid = mbid.to_string();
        self.state.update(|s| {
            s.is_loading = true;
            s.is_error = false;
        });

        let repository = self.repository.clone();
        let state = self.state.clone();
        self.details_flight.run(mbid.clone(), async move {
            match repository.favorite_album_details(&mbid).await {
                Ok(details) => state.update(|s| {
                    s.is_loading = false;
                    s.selected = details;
                }),
                Err(e) => {
                    warn!("Could not read favorite {}: {}", mbid, e);
                    state.update(|s| {
                        s.is_loading = false;
                        s.is_error = true;
                    })
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FavoriteAlbumsDao, FavoriteStore};
    use crate::repository::testing::FakeLastFm;
    use crate::retry::RetryPolicy;
    use std::sync::Arc;

    fn setup() -> (Arc<FavoriteStore>, FavoritesViewModel) {
        let store = Arc::new(FavoriteStore::open_in_memory().unwrap());
        let repo = Repository::new(
            Arc::new(FakeLastFm::new()),
            Arc::clone(&store) as Arc<dyn FavoriteAlbumsDao>,
            RetryPolicy::default(),
        );
        (store, FavoritesViewModel::new(repo))
    }

    fn favorite(mbid: &str) -> FavoriteAlbum {
        FavoriteAlbum {
            mbid: mbid.to_string(),
            album_name: format!("Album {}", mbid),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_load_lists_favorites() {
        let (store, vm) = setup();
        store.save_favorite_album(&favorite("1")).unwrap();
        store.save_favorite_album(&favorite("2")).unwrap();

        vm.load().await;

        let state = vm.state();
        assert!(!state.is_loading);
        assert_eq!(state.albums, vec![favorite("1"), favorite("2")]);
    }

    #[tokio::test]
    async fn test_open_reads_details() {
        let (store, vm) = setup();
        let details = FavoriteAlbumDetails {
            mbid: "1".to_string(),
            total_tracks: 4,
            ..Default::default()
        };
        store
            .save_favorite_with_details(&favorite("1"), &details)
            .unwrap();

        vm.open("1").await;
        assert_eq!(vm.state().selected, Some(details));

        vm.open("unknown").await;
        assert_eq!(vm.state().selected, None);
        assert!(!vm.state().is_error);
    }
}
