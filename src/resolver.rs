use crate::api::PlaylistApi;
use crate::types::{
    NormalizedQuery, RawTrackRecord, Resolution, ResolvedTrack, SearchKind, UnresolvedReason,
};

/// Build the fielded search query for a title and optional artist.
///
/// ```rust
/// use chart_playlist::resolver::build_query;
///
/// assert_eq!(build_query("Hypnotized", "John Summit"), "track:Hypnotized artist:John Summit");
/// assert_eq!(build_query("Hypnotized", ""), "track:Hypnotized");
/// ```
pub fn build_query(title: &str, artist: &str) -> String {
    let mut query = format!("track:{title}");
    if !artist.is_empty() {
        query.push_str(&format!(" artist:{artist}"));
    }
    query
}

/// Resolves scraped records to catalog tracks, one search per record.
///
/// Search errors are absorbed into [`Resolution::Unresolved`] so a batch of
/// records always runs to the end. There is no retry.
pub struct TrackResolver<'a, A: PlaylistApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: PlaylistApi + ?Sized> TrackResolver<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Search for the top hit of `track:<title> [artist:<artist>]`.
    pub async fn resolve(&self, title: &str, artist: &str) -> Resolution {
        self.search_top_hit(&build_query(title, artist)).await
    }

    async fn search_top_hit(&self, query: &str) -> Resolution {
        match self.api.search(query, SearchKind::Track, 1).await {
            Ok(candidates) => match candidates.into_iter().next() {
                Some(candidate) => {
                    log::debug!("Found: {candidate}");
                    Resolution::Matched(candidate)
                }
                None => {
                    log::debug!("No results found for {query}");
                    Resolution::Unresolved(UnresolvedReason::NoMatch)
                }
            },
            Err(e) => {
                log::warn!("Error searching for song {query}: {e}");
                Resolution::Unresolved(UnresolvedReason::SearchFailed(e.to_string()))
            }
        }
    }

    /// Normalize a record and resolve it.
    pub async fn resolve_record(&self, record: &RawTrackRecord) -> ResolvedTrack {
        let query = NormalizedQuery::from_record(record);
        let search_query = build_query(&query.cleaned_title, &query.artist);
        let resolution = self.search_top_hit(&search_query).await;
        ResolvedTrack {
            record: record.clone(),
            query,
            search_query,
            resolution,
        }
    }
}
