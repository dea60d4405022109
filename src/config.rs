//! Runtime configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Default Last.fm web service endpoint.
pub const DEFAULT_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// Default location of the favorites database.
pub const DEFAULT_DATABASE_PATH: &str = "music_organizer.db";

/// Settings shared by the API client, the repository and the view models.
#[derive(Clone)]
pub struct Config {
    /// Last.fm API key sent with every request.
    pub api_key: String,
    /// Base URL of the Last.fm web service.
    pub base_url: String,
    /// Path of the SQLite file holding favorites.
    pub database_path: PathBuf,
    /// Retry policy applied to every remote read.
    pub retry: RetryPolicy,
    /// Wait before a scroll-triggered page fetch is issued.
    pub page_debounce: Duration,
}

// Keep the API key out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("database_path", &self.database_path)
            .field("retry", &self.retry)
            .field("page_debounce", &self.page_debounce)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            retry: RetryPolicy::default(),
            page_debounce: Duration::from_secs(1),
        }
    }
}

impl Config {
    /// Create a configuration with the given API key and defaults elsewhere.
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Override the web service base URL.
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the favorites database location.
    pub fn with_database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database_path = path.into();
        self
    }

    /// Override the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the pagination debounce.
    pub fn with_page_debounce(mut self, debounce: Duration) -> Self {
        self.page_debounce = debounce;
        self
    }
}
