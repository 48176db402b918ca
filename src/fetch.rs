//! Raw page fetching for chart sources.
//!
//! Adapters only see the [`PageFetcher`] trait. [`HttpPageFetcher`] is the
//! production implementation on top of any [`HttpClient`].

use crate::headers::{add_browser_headers, add_extra_headers};
use crate::{ChartPlaylistError, Result};
use async_trait::async_trait;
use http_client::{HttpClient, Request};
use http_types::{Method, Url};
use std::fs;
use std::path::{Path, PathBuf};

const MAX_REDIRECTS: u32 = 5;

/// A GET request for a chart page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub url: String,
    /// Headers added on top of the default browser headers
    pub headers: Vec<(String, String)>,
}

impl PageRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A fetched page body with its final status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx page into [`ChartPlaylistError::Status`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ChartPlaylistError::Status {
                status: self.status,
                url: self.url,
            })
        }
    }
}

/// Fetches raw chart markup.
#[async_trait(?Send)]
pub trait PageFetcher {
    /// Fetch a page. Non-2xx responses are returned, not turned into errors.
    async fn fetch(&self, request: &PageRequest) -> Result<FetchedPage>;
}

/// [`PageFetcher`] backed by an [`HttpClient`].
///
/// Sends browser-like headers, follows redirects itself and, when a debug
/// directory is set, writes every response body to disk.
///
/// # Examples
///
/// ```rust,no_run
/// use chart_playlist::{HttpPageFetcher, PageFetcher, PageRequest};
///
/// # tokio_test::block_on(async {
/// let fetcher = HttpPageFetcher::new(Box::new(http_client::native::NativeClient::new()));
/// let page = fetcher
///     .fetch(&PageRequest::new("https://www.billboard.com/charts/hot-100/2021-01-02"))
///     .await?;
/// println!("status {}", page.status);
/// # Ok::<(), chart_playlist::ChartPlaylistError>(())
/// # });
/// ```
pub struct HttpPageFetcher {
    client: Box<dyn HttpClient>,
    debug_dir: Option<PathBuf>,
}

impl HttpPageFetcher {
    pub fn new(client: Box<dyn HttpClient>) -> Self {
        Self {
            client,
            debug_dir: None,
        }
    }

    /// Save every fetched body under `debug_dir`.
    pub fn with_debug_dir(mut self, debug_dir: Option<PathBuf>) -> Self {
        self.debug_dir = debug_dir;
        self
    }

    async fn get_with_redirects(&self, request: &PageRequest, url: &str) -> Result<FetchedPage> {
        let mut current_url = url.to_string();

        for redirect_count in 0..=MAX_REDIRECTS {
            let parsed = current_url
                .parse::<Url>()
                .map_err(|e| ChartPlaylistError::Http(format!("Invalid URL {current_url}: {e}")))?;

            let mut http_request = Request::new(Method::Get, parsed.clone());
            add_browser_headers(&mut http_request);
            add_extra_headers(&mut http_request, &request.headers);

            let mut response = self
                .client
                .send(http_request)
                .await
                .map_err(|e| ChartPlaylistError::Http(e.to_string()))?;

            let status: u16 = response.status().into();

            if status == 301 || status == 302 || status == 303 || status == 307 || status == 308 {
                let location = response
                    .header("location")
                    .and_then(|values| values.get(0))
                    .map(|value| value.as_str().to_string());

                if let Some(location) = location {
                    let next = parsed.join(&location).map_err(|e| {
                        ChartPlaylistError::Http(format!("Invalid redirect target {location}: {e}"))
                    })?;
                    log::debug!(
                        "Following redirect {} from {current_url} to {next}",
                        redirect_count + 1
                    );
                    current_url = next.to_string();
                    continue;
                }
            }

            let body = response
                .body_string()
                .await
                .map_err(|e| ChartPlaylistError::Http(e.to_string()))?;

            log::debug!(
                "Fetched {current_url}: status {status}, {} bytes",
                body.len()
            );

            if let Some(debug_dir) = &self.debug_dir {
                save_debug_response(debug_dir, &current_url, status, &body);
            }

            return Ok(FetchedPage {
                url: current_url,
                status,
                body,
            });
        }

        Err(ChartPlaylistError::Http(format!(
            "Too many redirects fetching {url}"
        )))
    }
}

#[async_trait(?Send)]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<FetchedPage> {
        self.get_with_redirects(request, &request.url).await
    }
}

/// Save a response body to the debug directory
fn save_debug_response(debug_dir: &Path, url: &str, status_code: u16, body: &str) {
    if let Err(e) = try_save_debug_response(debug_dir, url, status_code, body) {
        log::warn!("Failed to save debug response: {e}");
    }
}

fn try_save_debug_response(debug_dir: &Path, url: &str, status_code: u16, body: &str) -> Result<()> {
    fs::create_dir_all(debug_dir)?;

    let file_path = debug_dir.join(debug_file_name(url, status_code, chrono::Utc::now()));
    fs::write(&file_path, body)?;

    log::debug!("Saved HTTP response to {file_path:?} (status: {status_code}, url: {url})");
    Ok(())
}

/// File name for a saved response: timestamp, sanitized URL and status.
pub(crate) fn debug_file_name(
    url: &str,
    status_code: u16,
    now: chrono::DateTime<chrono::Utc>,
) -> String {
    let timestamp = now.format("%Y%m%d_%H%M%S_%3f");
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let safe_path = without_scheme.replace(['/', '?', '&', '=', '%', '+', ':'], "_");

    format!("{timestamp}_{safe_path}_status{status_code}.html")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_debug_file_name() {
        let now = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 5).unwrap();
        let name = debug_file_name("https://soundcloud.com/charts/top?genre=danceedm", 200, now);
        assert_eq!(
            name,
            "20240501_123005_000_soundcloud.com_charts_top_genre_danceedm_status200.html"
        );
    }

    #[test]
    fn test_error_for_status() {
        let ok = FetchedPage {
            url: "https://example.com".to_string(),
            status: 200,
            body: String::new(),
        };
        assert!(ok.error_for_status().is_ok());

        let missing = FetchedPage {
            url: "https://example.com/gone".to_string(),
            status: 404,
            body: String::new(),
        };
        match missing.error_for_status() {
            Err(ChartPlaylistError::Status { status, url }) => {
                assert_eq!(status, 404);
                assert_eq!(url, "https://example.com/gone");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_page_request_headers() {
        let request = PageRequest::new("https://www.traxsource.com/")
            .with_header("Referer", "https://www.traxsource.com/");
        assert_eq!(
            request.headers,
            vec![(
                "Referer".to_string(),
                "https://www.traxsource.com/".to_string()
            )]
        );
    }
}
