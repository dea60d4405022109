//! Album detail screen.

use tokio::sync::watch;

use super::flight::{Completion, SingleFlight};
use super::StateChannel;
use crate::models::DetailedAlbum;
use crate::repository::Repository;

/// Snapshot of the album detail screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlbumDetailsState {
    pub is_loading: bool,
    pub is_error: bool,
    pub album: Option<DetailedAlbum>,
}

/// Holds the album detail screen state and runs its request.
pub struct AlbumDetailsViewModel {
    repository: Repository,
    state: StateChannel<AlbumDetailsState>,
    flight: SingleFlight<(String, String)>,
}

impl AlbumDetailsViewModel {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            state: StateChannel::new(AlbumDetailsState::default()),
            flight: SingleFlight::new(),
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> AlbumDetailsState {
        self.state.snapshot()
    }

    /// Receive every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<AlbumDetailsState> {
        self.state.subscribe()
    }

    /// Load the details of `album` by `artist`.
    pub fn load(&self, artist: &str, album: &str) -> Completion {
        let key = (artist.to_string(), album.to_string());
        self.state.update(|s| {
            s.is_loading = true;
            s.is_error = false;
        });

        let repository = self.repository.clone();
        let state = self.state.clone();
        self.flight.run(key.clone(), async move {
            let (artist, album) = key;
            match repository.album_details(&artist, &album).await {
                Ok(details) => state.update(|s| {
                    s.is_loading = false;
                    s.album = Some(details);
                }),
                Err(_) => state.update(|s| {
                    s.is_loading = false;
                    s.is_error = true;
                }),
            }
        })
    }
}

/// Format a duration in seconds as `MM:SS`, or `HH:MM:SS` from one hour on.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
