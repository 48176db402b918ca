pub mod api;
pub mod assembler;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod fetch;
pub mod headers;
pub mod listing;
pub mod normalize;
pub mod resolver;
pub mod sources;
pub mod types;

pub use api::{PlaylistApi, MAX_ITEMS_PER_REQUEST};
pub use assembler::{AssemblyOutcome, PlaylistAssembler, DEFAULT_LIMIT};
pub use client::SpotifyClient;
pub use config::Config;
pub use error::ChartPlaylistError;
pub use events::{LogProgress, NoProgress, PipelineEvent, ProgressHandler};
pub use fetch::{FetchedPage, HttpPageFetcher, PageFetcher, PageRequest};
pub use resolver::TrackResolver;
pub use sources::{ChartKind, ChartSource};
pub use types::{
    ChartLabels, NormalizedQuery, PlaylistHandle, Rank, RawTrackRecord, Resolution,
    ResolvedTrack, ScrapeOutcome, SearchKind, TrackCandidate, UnresolvedReason,
};

#[cfg(feature = "mock")]
pub use api::MockPlaylistApi;

pub type Result<T> = std::result::Result<T, ChartPlaylistError>;
