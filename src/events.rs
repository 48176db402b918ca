//! # Pipeline Progress Events
//!
//! The assembler reports every stage of a run as a [`PipelineEvent`]. Callers
//! decide how to present them by supplying a [`ProgressHandler`].

use crate::types::{PlaylistHandle, RawTrackRecord, TrackCandidate};
use serde::{Deserialize, Serialize};

/// Events emitted while resolving records and assembling a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PipelineEvent {
    /// A record is about to be searched (1-based index); its result follows
    Resolving {
        index: usize,
        total: usize,
        record: RawTrackRecord,
    },
    /// The search returned a candidate
    Matched {
        index: usize,
        query: String,
        candidate: TrackCandidate,
    },
    /// The search returned nothing or failed
    Unmatched {
        index: usize,
        query: String,
        /// Error text when the search itself failed
        error: Option<String>,
    },
    /// All searches are done
    ResolutionSummary { attempted: usize, resolved: usize },
    /// Nothing resolved, so no playlist will be created
    NoMatches { attempted: usize },
    PlaylistCreated { playlist: PlaylistHandle },
    /// One add request succeeded (1-based batch number)
    BatchAdded {
        batch: usize,
        added: usize,
        total_added: usize,
    },
    /// A playlist call failed; nothing after it was attempted
    Failed { stage: String, error: String },
    /// Run ended; `playlist_url` is only set on full success
    Finished { playlist_url: Option<String> },
}

/// Receives pipeline progress.
pub trait ProgressHandler {
    fn handle_event(&mut self, event: PipelineEvent);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressHandler for LogProgress {
    fn handle_event(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::Resolving {
                index,
                total,
                record,
            } => log::info!("({index}/{total}) Searching for: {record}"),
            PipelineEvent::Matched { candidate, .. } => log::info!("Found: {candidate}"),
            PipelineEvent::Unmatched {
                query,
                error: None,
                ..
            } => log::info!("No results found for {query}"),
            PipelineEvent::Unmatched {
                query,
                error: Some(error),
                ..
            } => log::warn!("Search failed for {query}: {error}"),
            PipelineEvent::ResolutionSummary { attempted, resolved } => {
                log::info!("Found {resolved} of {attempted} tracks")
            }
            PipelineEvent::NoMatches { .. } => log::warn!("No songs found to add to playlist"),
            PipelineEvent::PlaylistCreated { playlist } => {
                log::info!("Created playlist: {}", playlist.name)
            }
            PipelineEvent::BatchAdded { added, .. } => {
                log::info!("Added {added} songs to playlist")
            }
            PipelineEvent::Failed { stage, error } => {
                log::error!("Error while {stage}: {error}")
            }
            PipelineEvent::Finished { playlist_url } => match playlist_url {
                Some(url) => log::info!("Playlist ready: {url}"),
                None => log::info!("Finished without a playlist"),
            },
        }
    }
}

/// Discards all events.
#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressHandler for NoProgress {
    fn handle_event(&mut self, _event: PipelineEvent) {}
}
