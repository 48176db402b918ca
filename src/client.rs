use crate::api::{PlaylistApi, MAX_ITEMS_PER_REQUEST};
use crate::config::Config;
use crate::headers::add_api_headers;
use crate::types::{PlaylistHandle, SearchKind, TrackCandidate};
use crate::{ChartPlaylistError, Result};
use async_trait::async_trait;
use http_client::{HttpClient, Request, Response};
use http_types::{Method, Url};
use serde::Deserialize;

/// Retry delay reported when a 429 response carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Client for the Spotify Web API.
///
/// Holds one access token for the whole run. Requests are sent once; rate
/// limiting and API errors are reported, never retried.
///
/// # Examples
///
/// ```rust,no_run
/// use chart_playlist::{Config, PlaylistApi, SearchKind, SpotifyClient};
///
/// #[tokio::main]
/// async fn main() -> chart_playlist::Result<()> {
///     let config = Config::from_env()?;
///     let http_client = http_client::native::NativeClient::new();
///     let client = SpotifyClient::connect(Box::new(http_client), &config).await?;
///
///     let hits = client.search("track:Hypnotized artist:John Summit", SearchKind::Track, 1).await?;
///     println!("{hits:?}");
///     Ok(())
/// }
/// ```
pub struct SpotifyClient {
    client: Box<dyn HttpClient>,
    api_base_url: String,
    access_token: String,
}

impl SpotifyClient {
    /// Exchange the configured refresh token for an access token.
    pub async fn connect(client: Box<dyn HttpClient>, config: &Config) -> Result<Self> {
        let request = token_request(config)?;

        let mut response = client
            .send(request)
            .await
            .map_err(|e| ChartPlaylistError::Http(e.to_string()))?;
        let body = read_checked_body(&mut response).await?;

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| ChartPlaylistError::Parse(format!("Invalid token response: {e}")))?;

        log::info!("Authenticated with the streaming service");
        Ok(Self::with_access_token(
            client,
            config.api_base_url.clone(),
            token.access_token,
        ))
    }

    /// Build a client from an access token obtained elsewhere.
    pub fn with_access_token(
        client: Box<dyn HttpClient>,
        api_base_url: String,
        access_token: String,
    ) -> Self {
        Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    fn search_url(&self, query: &str, kind: SearchKind, limit: u32) -> String {
        format!(
            "{}/search?q={}&type={}&limit={}",
            self.api_base_url,
            urlencoding::encode(query),
            kind.as_str(),
            limit
        )
    }

    async fn send_api_request(
        &self,
        method: Method,
        url: &str,
        json_body: Option<serde_json::Value>,
    ) -> Result<String> {
        log::debug!("{method} {url}");
        let request = api_request(method, url, &self.access_token, json_body)?;

        let mut response = self
            .client
            .send(request)
            .await
            .map_err(|e| ChartPlaylistError::Http(e.to_string()))?;

        read_checked_body(&mut response).await
    }
}

#[async_trait(?Send)]
impl PlaylistApi for SpotifyClient {
    async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        limit: u32,
    ) -> Result<Vec<TrackCandidate>> {
        let url = self.search_url(query, kind, limit);
        let body = self.send_api_request(Method::Get, &url, None).await?;
        parse_search_response(&body)
    }

    async fn current_user_id(&self) -> Result<String> {
        let url = format!("{}/me", self.api_base_url);
        let body = self.send_api_request(Method::Get, &url, None).await?;

        let profile: UserProfile = serde_json::from_str(&body)
            .map_err(|e| ChartPlaylistError::Parse(format!("Invalid user profile: {e}")))?;
        Ok(profile.id)
    }

    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> Result<PlaylistHandle> {
        let url = format!(
            "{}/users/{}/playlists",
            self.api_base_url,
            urlencoding::encode(owner_id)
        );
        let payload = serde_json::json!({
            "name": name,
            "public": public,
            "description": description,
        });

        let body = self
            .send_api_request(Method::Post, &url, Some(payload))
            .await?;
        parse_playlist_response(&body)
    }

    async fn add_items(&self, playlist_id: &str, item_ids: &[String]) -> Result<()> {
        if item_ids.len() > MAX_ITEMS_PER_REQUEST {
            return Err(ChartPlaylistError::Api {
                status: 400,
                message: format!(
                    "Cannot add {} items in one request (maximum {MAX_ITEMS_PER_REQUEST})",
                    item_ids.len()
                ),
            });
        }

        let url = format!(
            "{}/playlists/{}/tracks",
            self.api_base_url,
            urlencoding::encode(playlist_id)
        );
        self.send_api_request(Method::Post, &url, Some(add_items_payload(item_ids)))
            .await?;
        Ok(())
    }
}

fn parse_url(url: &str) -> Result<Url> {
    url.parse::<Url>()
        .map_err(|e| ChartPlaylistError::Http(format!("Invalid URL {url}: {e}")))
}

fn token_request(config: &Config) -> Result<Request> {
    let token_url = format!("{}/api/token", config.accounts_base_url);
    log::debug!("Requesting access token from {token_url}");

    let mut request = Request::new(Method::Post, parse_url(&token_url)?);
    let _ = request.insert_header("Content-Type", "application/x-www-form-urlencoded");
    let _ = request.insert_header("Accept", "application/json");
    request.set_body(token_form(config));
    Ok(request)
}

fn api_request(
    method: Method,
    url: &str,
    access_token: &str,
    json_body: Option<serde_json::Value>,
) -> Result<Request> {
    let mut request = Request::new(method, parse_url(url)?);
    add_api_headers(&mut request, access_token);

    if let Some(json_body) = json_body {
        let _ = request.insert_header("Content-Type", "application/json");
        request.set_body(json_body.to_string());
    }
    Ok(request)
}

fn token_form(config: &Config) -> String {
    [
        ("grant_type", "refresh_token"),
        ("refresh_token", config.spotify_refresh_token.as_str()),
        ("client_id", config.spotify_client_id.as_str()),
        ("client_secret", config.spotify_client_secret.as_str()),
    ]
    .iter()
    .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
    .collect::<Vec<_>>()
    .join("&")
}

fn add_items_payload(item_ids: &[String]) -> serde_json::Value {
    let uris: Vec<String> = item_ids
        .iter()
        .map(|id| format!("spotify:track:{id}"))
        .collect();
    serde_json::json!({ "uris": uris })
}

/// Read the body, turning 429 and other non-2xx statuses into errors.
async fn read_checked_body(response: &mut Response) -> Result<String> {
    let status: u16 = response.status().into();

    if status == 429 {
        let retry_after = response
            .header("retry-after")
            .and_then(|values| values.get(0))
            .and_then(|value| value.as_str().trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        log::warn!("Rate limited by the streaming service, retry after {retry_after}s");
        return Err(ChartPlaylistError::RateLimit { retry_after });
    }

    let body = response
        .body_string()
        .await
        .map_err(|e| ChartPlaylistError::Http(e.to_string()))?;

    if !(200..300).contains(&status) {
        return Err(api_error(status, &body));
    }

    Ok(body)
}

// =============================================================================
// Response models
// =============================================================================

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserProfile {
    id: String,
}

#[derive(Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<Paging>,
}

#[derive(Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub items: Vec<Option<ApiTrack>>,
}

#[derive(Deserialize)]
pub struct ApiTrack {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ApiArtist>,
}

#[derive(Deserialize)]
pub struct ApiArtist {
    pub name: String,
}

#[derive(Deserialize)]
pub struct ApiPlaylist {
    pub id: String,
    pub name: String,
    pub external_urls: ExternalUrls,
}

#[derive(Deserialize)]
pub struct ExternalUrls {
    pub spotify: String,
}

/// Ranked track candidates from a search response body.
///
/// Null items and tracks without an id (local files) are skipped.
pub fn parse_search_response(body: &str) -> Result<Vec<TrackCandidate>> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| ChartPlaylistError::Parse(format!("Invalid search response: {e}")))?;

    let items = response.tracks.map(|page| page.items).unwrap_or_default();

    Ok(items
        .into_iter()
        .flatten()
        .filter_map(|track| {
            let id = track.id?;
            Some(TrackCandidate {
                id,
                name: track.name,
                primary_artist_name: track
                    .artists
                    .into_iter()
                    .next()
                    .map(|artist| artist.name)
                    .unwrap_or_default(),
            })
        })
        .collect())
}

pub fn parse_playlist_response(body: &str) -> Result<PlaylistHandle> {
    let playlist: ApiPlaylist = serde_json::from_str(body)
        .map_err(|e| ChartPlaylistError::Parse(format!("Invalid playlist response: {e}")))?;

    Ok(PlaylistHandle {
        id: playlist.id,
        name: playlist.name,
        external_url: playlist.external_urls.spotify,
    })
}

/// Error for a non-2xx API response.
///
/// Understands both the Web API shape (`{"error": {"message": ..}}`) and the
/// accounts service shape (`{"error": .., "error_description": ..}`). Any
/// other body is passed through as the message.
pub fn api_error(status: u16, body: &str) -> ChartPlaylistError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            let error = value.get("error")?;
            if let Some(message) = error.get("message").and_then(|m| m.as_str()) {
                return Some(message.to_string());
            }
            if let Some(description) = value.get("error_description").and_then(|d| d.as_str()) {
                return Some(description.to_string());
            }
            error.as_str().map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string());

    ChartPlaylistError::Api { status, message }
}
