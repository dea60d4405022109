//! Local favorites store.
//!
//! Favorites live in a small SQLite database with two tables keyed by the
//! album identifier:
//!
//! * `favorite_album` - rows for the favorites list.
//! * `favorite_album_details` - the album detail snapshot, with the track list
//!   stored as a JSON text column.
//!
//! Writes use `INSERT OR REPLACE`, so saving the same album twice keeps the
//! last version. The connection sits behind a mutex, which serializes
//! writers.

pub mod model;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::error::{OrganizerError, Result};

pub use model::{FavoriteAlbum, FavoriteAlbumDetails, FavoriteTrack};

const SCHEMA_VERSION: i64 = 1;

/// Queries the repository runs against the favorites store.
pub trait FavoriteAlbumsDao: Send + Sync {
    /// Insert or replace a favorites-list row.
    fn save_favorite_album(&self, album: &FavoriteAlbum) -> Result<()>;

    /// Insert or replace an album detail snapshot.
    fn save_favorite_album_details(&self, details: &FavoriteAlbumDetails) -> Result<()>;

    /// Save both records of one favorite.
    fn save_favorite_with_details(
        &self,
        album: &FavoriteAlbum,
        details: &FavoriteAlbumDetails,
    ) -> Result<()> {
        self.save_favorite_album(album)?;
        self.save_favorite_album_details(details)
    }

    /// All favorites, oldest write first.
    fn all_favorite_albums(&self) -> Result<Vec<FavoriteAlbum>>;

    /// Detail snapshot of one favorite.
    fn favorite_album_details(&self, mbid: &str) -> Result<Option<FavoriteAlbumDetails>>;
}

/// SQLite-backed [`FavoriteAlbumsDao`].
#[derive(Debug)]
pub struct FavoriteStore {
    conn: Mutex<Connection>,
}

impl FavoriteStore {
    /// Open (or create) the database file and make sure the schema exists.
    /// Missing parent directories are created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening favorites store at {}", path.display());
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        create_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| OrganizerError::LockPoisoned)
    }
}

/// Create both tables if missing and stamp the schema version.
fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS favorite_album (
            mbid TEXT PRIMARY KEY NOT NULL,
            album_image_url TEXT NOT NULL,
            album_name TEXT NOT NULL,
            artist_name TEXT NOT NULL,
            play_count INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS favorite_album_details (
            mbid TEXT PRIMARY KEY NOT NULL,
            album_image_url TEXT NOT NULL,
            album_name TEXT NOT NULL,
            artist_name TEXT NOT NULL,
            total_tracks INTEGER NOT NULL,
            total_duration INTEGER NOT NULL,
            tracks TEXT NOT NULL
        );

        COMMIT;",
    )?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn from_sql_int(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn insert_album(conn: &Connection, album: &FavoriteAlbum) -> Result<()> {
    conn.prepare_cached(
        "INSERT OR REPLACE INTO favorite_album
            (mbid, album_image_url, album_name, artist_name, play_count)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?
    .execute(params![
        album.mbid,
        album.album_image_url,
        album.album_name,
        album.artist_name,
        to_sql_int(album.play_count),
    ])?;
    Ok(())
}

fn insert_details(conn: &Connection, details: &FavoriteAlbumDetails) -> Result<()> {
    let tracks = serde_json::to_string(&details.tracks)?;
    conn.prepare_cached(
        "INSERT OR REPLACE INTO favorite_album_details
            (mbid, album_image_url, album_name, artist_name, total_tracks, total_duration, tracks)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?
    .execute(params![
        details.mbid,
        details.album_image_url,
        details.album_name,
        details.artist_name,
        to_sql_int(details.total_tracks),
        to_sql_int(details.total_duration),
        tracks,
    ])?;
    Ok(())
}

fn album_from_row(row: &Row<'_>) -> rusqlite::Result<FavoriteAlbum> {
    Ok(FavoriteAlbum {
        mbid: row.get(0)?,
        album_image_url: row.get(1)?,
        album_name: row.get(2)?,
        artist_name: row.get(3)?,
        play_count: from_sql_int(row.get(4)?),
    })
}

impl FavoriteAlbumsDao for FavoriteStore {
    fn save_favorite_album(&self, album: &FavoriteAlbum) -> Result<()> {
        let conn = self.conn()?;
        insert_album(&conn, album)?;
        debug!("Saved favorite album {} ({})", album.album_name, album.mbid);
        Ok(())
    }

    fn save_favorite_album_details(&self, details: &FavoriteAlbumDetails) -> Result<()> {
        let conn = self.conn()?;
        insert_details(&conn, details)?;
        debug!(
            "Saved details for {} ({} tracks)",
            details.mbid, details.total_tracks
        );
        Ok(())
    }

    fn save_favorite_with_details(
        &self,
        album: &FavoriteAlbum,
        details: &FavoriteAlbumDetails,
    ) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        insert_album(&tx, album)?;
        insert_details(&tx, details)?;
        tx.commit()?;
        debug!("Saved favorite album {} with details", album.mbid);
        Ok(())
    }

    fn all_favorite_albums(&self) -> Result<Vec<FavoriteAlbum>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT mbid, album_image_url, album_name, artist_name, play_count
             FROM favorite_album
             ORDER BY rowid",
        )?;
        let albums = stmt
            .query_map([], album_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(albums)
    }

    fn favorite_album_details(&self, mbid: &str) -> Result<Option<FavoriteAlbumDetails>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT mbid, album_image_url, album_name, artist_name, total_tracks, total_duration, tracks
             FROM favorite_album_details
             WHERE mbid = ?1",
        )?;
        let row = stmt
            .query_row([mbid], |row| {
                Ok((
                    FavoriteAlbumDetails {
                        mbid: row.get(0)?,
                        album_image_url: row.get(1)?,
                        album_name: row.get(2)?,
                        artist_name: row.get(3)?,
                        total_tracks: from_sql_int(row.get(4)?),
                        total_duration: from_sql_int(row.get(5)?),
                        tracks: Vec::new(),
                    },
                    row.get::<_, String>(6)?,
                ))
            })
            .optional()?;

        match row {
            Some((mut details, tracks)) => {
                details.tracks = serde_json::from_str(&tracks)?;
                Ok(Some(details))
            }
            None => Ok(None),
        }
    }
}
