//! Data types shared by the chart adapters, the resolver and the assembler.
//!
//! Records flow one way: adapters produce [`RawTrackRecord`]s, the resolver
//! turns each one into a [`ResolvedTrack`], and the assembler feeds the matched
//! ones into a single [`PlaylistHandle`].

use serde::{Deserialize, Serialize};
use std::fmt;

// ================================================================================================
// SCRAPED RECORDS
// ================================================================================================

/// Chart position of a scraped record.
///
/// Ranked charts always carry a rank; when the rank element is missing from a
/// row the record is kept and marked [`Rank::NotAvailable`] instead of dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// The position printed on the chart
    Position(u32),
    /// The chart is ranked but this row had no readable position
    NotAvailable,
}

impl Rank {
    /// Parse a scraped rank label such as `"7"` or `" 12 "`.
    ///
    /// Anything that is not a plain number becomes [`Rank::NotAvailable`].
    pub fn parse(label: &str) -> Self {
        label
            .trim()
            .parse::<u32>()
            .map(Rank::Position)
            .unwrap_or(Rank::NotAvailable)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Position(position) => write!(f, "{position}"),
            Rank::NotAvailable => write!(f, "N/A"),
        }
    }
}

/// A single track as extracted from a chart source, before any matching.
///
/// # Examples
///
/// ```rust
/// use chart_playlist::{Rank, RawTrackRecord};
///
/// let ranked = RawTrackRecord::ranked(Rank::Position(1), "Flowers", "Miley Cyrus");
/// assert_eq!(ranked.to_string(), "#1: Flowers - Miley Cyrus");
///
/// let unranked = RawTrackRecord::new("Beat Of An Era", "Jimpster");
/// assert_eq!(unranked.to_string(), "Beat Of An Era - Jimpster");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawTrackRecord {
    /// Chart position, present only for ranked charts
    pub rank: Option<Rank>,
    /// Title as scraped; may still carry remix/feat annotations
    pub title: String,
    /// Artist as scraped or derived; empty when none could be found
    pub artist: String,
}

impl RawTrackRecord {
    /// Create a record for a chart without positions.
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            rank: None,
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Create a record for a ranked chart.
    pub fn ranked(rank: Rank, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            rank: Some(rank),
            title: title.into(),
            artist: artist.into(),
        }
    }
}

impl fmt::Display for RawTrackRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(rank) = &self.rank {
            write!(f, "#{rank}: ")?;
        }
        write!(f, "{} - {}", self.title, self.artist)
    }
}

/// Search terms derived from a [`RawTrackRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedQuery {
    /// Title with remix/feat/edit noise removed
    pub cleaned_title: String,
    /// Explicit artist, or one pulled out of the title; may be empty
    pub artist: String,
}

// ================================================================================================
// SCRAPE RESULTS
// ================================================================================================

/// Structured result of one [`crate::ChartSource::scrape`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeOutcome {
    /// Whether usable records are available from `tracks_data()`
    pub success: bool,
    /// Human readable summary or failure reason
    pub message: String,
    /// Number of records held by the adapter after the call
    pub record_count: usize,
    /// The records are the adapter's hardcoded substitute list, not live chart data
    pub is_fallback: bool,
}

impl ScrapeOutcome {
    pub fn extracted(record_count: usize, message: impl Into<String>) -> Self {
        Self {
            success: record_count > 0,
            message: message.into(),
            record_count,
            is_fallback: false,
        }
    }

    pub fn fallback(record_count: usize, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            record_count,
            is_fallback: true,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            record_count: 0,
            is_fallback: false,
        }
    }
}

impl fmt::Display for ScrapeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.success, self.is_fallback) {
            (true, true) => write!(f, "fallback ({} records): {}", self.record_count, self.message),
            (true, false) => write!(f, "ok ({} records): {}", self.record_count, self.message),
            (false, _) => write!(f, "failed: {}", self.message),
        }
    }
}

/// Names and descriptions a chart source suggests for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartLabels {
    /// File name for the plain-text track listing
    pub file_name: String,
    /// First line of the track listing
    pub heading: String,
    /// Playlist name offered when the user leaves it blank
    pub playlist_name: String,
    /// Playlist description
    pub description: String,
}

// ================================================================================================
// STREAMING SERVICE VALUES
// ================================================================================================

/// What kind of catalog item a search should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchKind {
    Track,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Track => "track",
        }
    }
}

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackCandidate {
    /// Opaque catalog identifier
    pub id: String,
    /// Track name as listed by the service
    pub name: String,
    /// Name of the first credited artist, empty if the service lists none
    pub primary_artist_name: String,
}

impl fmt::Display for TrackCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.primary_artist_name)
    }
}

/// A playlist created on the streaming service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistHandle {
    pub id: String,
    pub name: String,
    /// Public URL of the playlist
    pub external_url: String,
}

// ================================================================================================
// RESOLUTION
// ================================================================================================

/// Why a record did not resolve to a catalog track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnresolvedReason {
    /// The search ran and returned no candidates
    NoMatch,
    /// The search request itself failed
    SearchFailed(String),
}

/// Outcome of resolving one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Matched(TrackCandidate),
    Unresolved(UnresolvedReason),
}

impl Resolution {
    /// Catalog id of the match, if any.
    pub fn track_id(&self) -> Option<&str> {
        match self {
            Resolution::Matched(candidate) => Some(candidate.id.as_str()),
            Resolution::Unresolved(_) => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Resolution::Matched(_))
    }
}

/// A record paired with the query sent for it and the result of that query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTrack {
    pub record: RawTrackRecord,
    pub query: NormalizedQuery,
    /// Exact text sent to the catalog search
    pub search_query: String,
    pub resolution: Resolution,
}

impl ResolvedTrack {
    pub fn track_id(&self) -> Option<&str> {
        self.resolution.track_id()
    }
}
