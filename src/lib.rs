//! # Music Organizer
//!
//! Search artists on Last.fm, page through their top albums, look at album
//! details, and keep favorite albums in a local SQLite store.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use music_organizer::{Config, FavoriteStore, LastFmApi, Repository, SearchViewModel};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new("your_api_key");
//!     let repository = Repository::new(
//!         Arc::new(LastFmApi::new(&config)?),
//!         Arc::new(FavoriteStore::open(&config.database_path)?),
//!         config.retry,
//!     );
//!
//!     let search = SearchViewModel::new(repository, config.page_debounce);
//!     search.search("Cher").await;
//!     for artist in search.state().artists {
//!         println!("{}", artist.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! - [`api`] - Last.fm endpoints ([`LastFmService`]) and the HTTP client
//! - [`db`] - favorites store ([`FavoriteAlbumsDao`])
//! - [`Repository`] - remote reads with bounded retry, favorite writes
//! - [`state`] - per-screen view-state holders

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
mod repository;
pub mod retry;
pub mod state;

pub use api::{LastFmApi, LastFmService};
pub use config::Config;
pub use db::{FavoriteAlbum, FavoriteAlbumDetails, FavoriteAlbumsDao, FavoriteStore};
pub use error::{OrganizerError, Result};
pub use repository::Repository;
pub use retry::RetryPolicy;
pub use state::{
    AlbumDetailsViewModel, Completion, FavoritesViewModel, SearchViewModel, TopAlbumsViewModel,
};
