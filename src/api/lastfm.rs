//! HTTP client for the Last.fm web service.
//!
//! All methods hit the same endpoint (`/2.0/`) and differ only in the
//! `method` query parameter. The API key and `format=json` are appended to
//! every request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use super::{LastFmService, ALBUM_INFO_METHOD, SEARCH_METHOD, TOP_ALBUMS_METHOD};
use crate::config::Config;
use crate::error::{OrganizerError, Result};
use crate::models::{AlbumDetailResponse, ArtistSearchResponse, TopAlbumsResponse};

const RESPONSE_FORMAT: &str = "json";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Last.fm API client.
///
/// # Example
///
/// ```rust,no_run
/// use music_organizer::api::{LastFmApi, LastFmService};
/// use music_organizer::Config;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let api = LastFmApi::new(&Config::new("your_api_key"))?;
///     let response = api.search_artists("Cher", 1).await?;
///     if let Some(matches) = response.results.and_then(|r| r.artistmatches) {
///         for artist in matches.artist {
///             println!("{}", artist.name);
///         }
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LastFmApi {
    client: Client,
    base_url: String,
    api_key: String,
}

impl LastFmApi {
    /// Create a client from the configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("music-organizer/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Create a client on top of an already configured `reqwest::Client`.
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Make a GET request for `method` with extra query parameters.
    async fn get_api(&self, method: &str, params: &[(&str, &str)]) -> Result<Value> {
        debug!("GET {} method={} params={:?}", self.base_url, method, params);

        let mut query: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 3);
        query.push(("method", method));
        query.extend_from_slice(params);
        query.push(("api_key", self.api_key.as_str()));
        query.push(("format", RESPONSE_FORMAT));

        let response = self.client.get(&self.base_url).query(&query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let data = match serde_json::from_str::<Value>(&body) {
            Ok(data) => data,
            Err(_) if !status.is_success() => {
                error!("Last.fm HTTP {} for {}", status, method);
                return Err(OrganizerError::Api {
                    code: i64::from(status.as_u16()),
                    message: status.canonical_reason().unwrap_or("HTTP error").to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        check_error_envelope(&data)?;

        if !status.is_success() {
            error!("Last.fm HTTP {} for {}", status, method);
            return Err(OrganizerError::Api {
                code: i64::from(status.as_u16()),
                message: status.canonical_reason().unwrap_or("HTTP error").to_string(),
            });
        }

        Ok(data)
    }

    async fn get_typed<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let data = self.get_api(method, params).await?;
        Ok(serde_json::from_value(data)?)
    }
}

/// Map a `{"error": code, "message": ...}` body to an error.
fn check_error_envelope(data: &Value) -> Result<()> {
    if let Some(code) = data.get("error") {
        let code = code
            .as_i64()
            .or_else(|| code.as_str().and_then(|s| s.parse().ok()))
            .unwrap_or(-1);
        let message = data
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error");
        error!("Last.fm API error {}: {}", code, message);
        return Err(OrganizerError::Api {
            code,
            message: message.to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl LastFmService for LastFmApi {
    async fn search_artists(&self, artist: &str, page: u32) -> Result<ArtistSearchResponse> {
        let page = page.to_string();
        self.get_typed(SEARCH_METHOD, &[("artist", artist), ("page", page.as_str())])
            .await
    }

    async fn top_albums(&self, artist: &str, page: u32) -> Result<TopAlbumsResponse> {
        let page = page.to_string();
        self.get_typed(TOP_ALBUMS_METHOD, &[("artist", artist), ("page", page.as_str())])
            .await
    }

    async fn album_details(&self, artist: &str, album: &str) -> Result<AlbumDetailResponse> {
        self.get_typed(ALBUM_INFO_METHOD, &[("artist", artist), ("album", album)])
            .await
    }
}
