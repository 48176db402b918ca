use crate::types::{PlaylistHandle, SearchKind, TrackCandidate};
use crate::Result;
use async_trait::async_trait;

/// Largest number of items the service accepts in one add request.
pub const MAX_ITEMS_PER_REQUEST: usize = 100;

/// Streaming service operations the resolver and assembler depend on.
///
/// Implementations report transport and API failures as errors; deciding
/// whether a failure is fatal is left to the caller.
///
/// # Mocking Support
///
/// When the `mock` feature is enabled, this crate provides `MockPlaylistApi`
/// that implements this trait using the `mockall` library.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait(?Send)]
pub trait PlaylistApi {
    /// Search the catalog and return at most `limit` ranked candidates.
    async fn search(&self, query: &str, kind: SearchKind, limit: u32)
        -> Result<Vec<TrackCandidate>>;

    /// Identifier of the account the client is authenticated as.
    async fn current_user_id(&self) -> Result<String>;

    /// Create an empty playlist owned by `owner_id`.
    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> Result<PlaylistHandle>;

    /// Append tracks to a playlist, in order.
    ///
    /// Callers must not pass more than [`MAX_ITEMS_PER_REQUEST`] ids at once.
    async fn add_items(&self, playlist_id: &str, item_ids: &[String]) -> Result<()>;
}
