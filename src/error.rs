use thiserror::Error;

/// Error types for chart scraping and playlist assembly.
///
/// Most of these never reach the caller of the pipeline: chart adapters and the
/// track resolver catch them at their boundary and turn them into structured
/// outcomes. They surface directly from [`crate::PlaylistApi`] calls, from
/// [`crate::Config`] loading and from file output.
///
/// # Error Handling Examples
///
/// ```rust,no_run
/// use chart_playlist::{ChartPlaylistError, Config};
///
/// match Config::from_env() {
///     Ok(config) => println!("Output goes to {}", config.output_dir.display()),
///     Err(ChartPlaylistError::Config(msg)) => eprintln!("Configuration problem: {}", msg),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum ChartPlaylistError {
    /// HTTP/network related errors.
    ///
    /// This includes connection failures, timeouts, DNS errors, and other
    /// low-level networking issues.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A chart page answered with a non-success status code.
    #[error("Request to {url} failed with status {status}")]
    Status {
        /// HTTP status code of the response
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// Failed to parse a response.
    ///
    /// This can happen when a chart site or the streaming API changes the
    /// shape of the data it returns.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The streaming API rejected a request.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the API
        status: u16,
        /// Error message from the API body, or the raw body when it is not JSON
        message: String,
    },

    /// Rate limiting from the streaming API.
    ///
    /// The `retry_after` field indicates how many seconds the API asked the
    /// client to wait. Requests are never retried automatically.
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimit {
        /// Number of seconds to wait before retrying
        retry_after: u64,
    },

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system I/O errors.
    ///
    /// This can occur when saving track listings or debug responses.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
