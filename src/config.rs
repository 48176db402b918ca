//! Runtime configuration read from the environment.

use crate::{ChartPlaylistError, Result};
use std::env;
use std::path::PathBuf;

pub const CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";
pub const REFRESH_TOKEN_ENV: &str = "SPOTIFY_REFRESH_TOKEN";

const OUTPUT_DIR_ENV: &str = "CHART_PLAYLIST_OUTPUT_DIR";
const DEBUG_DIR_ENV: &str = "CHART_PLAYLIST_DEBUG_DIR";
const API_BASE_URL_ENV: &str = "SPOTIFY_API_BASE_URL";
const ACCOUNTS_BASE_URL_ENV: &str = "SPOTIFY_ACCOUNTS_BASE_URL";

pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";

/// Credentials and paths for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    /// Long-lived token exchanged for an access token at startup
    pub spotify_refresh_token: String,
    /// Directory for track listing files
    pub output_dir: PathBuf,
    /// When set, every fetched chart page is saved here
    pub debug_dir: Option<PathBuf>,
    pub api_base_url: String,
    pub accounts_base_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("spotify_client_id", &self.spotify_client_id)
            .field("spotify_client_secret", &"<redacted>")
            .field("spotify_refresh_token", &"<redacted>")
            .field("output_dir", &self.output_dir)
            .field("debug_dir", &self.debug_dir)
            .field("api_base_url", &self.api_base_url)
            .field("accounts_base_url", &self.accounts_base_url)
            .finish()
    }
}

impl Config {
    /// Load a `.env` file if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from dotenv file {path:?}");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup.
    ///
    /// Blank values count as unset. Every missing required key is listed in
    /// the one error returned.
    ///
    /// ```rust
    /// use chart_playlist::Config;
    ///
    /// let config = Config::from_lookup(|key| match key {
    ///     "SPOTIFY_CLIENT_ID" => Some("id".to_string()),
    ///     "SPOTIFY_CLIENT_SECRET" => Some("secret".to_string()),
    ///     "SPOTIFY_REFRESH_TOKEN" => Some("refresh".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.output_dir, std::path::PathBuf::from("."));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut missing = Vec::new();
        let mut required = |key: &'static str| {
            get(key).unwrap_or_else(|| {
                missing.push(key);
                String::new()
            })
        };

        let spotify_client_id = required(CLIENT_ID_ENV);
        let spotify_client_secret = required(CLIENT_SECRET_ENV);
        let spotify_refresh_token = required(REFRESH_TOKEN_ENV);

        if !missing.is_empty() {
            return Err(ChartPlaylistError::Config(format!(
                "Missing environment variables: {}",
                missing.join(", ")
            )));
        }

        let config = Self {
            spotify_client_id,
            spotify_client_secret,
            spotify_refresh_token,
            output_dir: get(OUTPUT_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            debug_dir: get(DEBUG_DIR_ENV).map(PathBuf::from),
            api_base_url: get(API_BASE_URL_ENV)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            accounts_base_url: get(ACCOUNTS_BASE_URL_ENV)
                .unwrap_or_else(|| DEFAULT_ACCOUNTS_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        };

        log::debug!("Loaded configuration: {config:?}");
        Ok(config)
    }
}
