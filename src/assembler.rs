//! Turns scraped records into a playlist.
//!
//! Records are resolved in order, then the matched ids are added to a new
//! public playlist in batches. A failed playlist call stops the run; batches
//! already added stay in the playlist.

use crate::api::{PlaylistApi, MAX_ITEMS_PER_REQUEST};
use crate::events::{PipelineEvent, ProgressHandler};
use crate::resolver::TrackResolver;
use crate::types::{PlaylistHandle, RawTrackRecord, Resolution, ResolvedTrack, UnresolvedReason};
use futures::StreamExt;
use std::cell::RefCell;

/// Records considered per run unless the caller says otherwise.
pub const DEFAULT_LIMIT: usize = 30;

/// What happened during one [`PlaylistAssembler::create_playlist`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyOutcome {
    /// Records searched for, after applying the limit
    pub attempted: usize,
    /// Every searched record with its resolution, in input order
    pub resolved: Vec<ResolvedTrack>,
    /// Set once the playlist exists, even if adding tracks later failed
    pub playlist: Option<PlaylistHandle>,
    /// Add requests that succeeded
    pub batches_added: usize,
    /// The playlist call that stopped the run
    pub failure: Option<String>,
}

impl AssemblyOutcome {
    fn empty() -> Self {
        Self {
            attempted: 0,
            resolved: Vec::new(),
            playlist: None,
            batches_added: 0,
            failure: None,
        }
    }

    /// Catalog ids of matched records, in input order.
    pub fn matched_ids(&self) -> Vec<String> {
        self.resolved
            .iter()
            .filter_map(|track| track.track_id().map(str::to_string))
            .collect()
    }

    pub fn matched_count(&self) -> usize {
        self.resolved
            .iter()
            .filter(|track| track.resolution.is_matched())
            .count()
    }

    /// URL of the finished playlist. `None` if no playlist was made or any
    /// playlist call failed.
    pub fn playlist_url(&self) -> Option<&str> {
        if self.failure.is_some() {
            return None;
        }
        self.playlist
            .as_ref()
            .map(|playlist| playlist.external_url.as_str())
    }

    pub fn is_success(&self) -> bool {
        self.playlist_url().is_some()
    }
}

/// Builds playlists on top of any [`PlaylistApi`].
///
/// # Examples
///
/// ```rust,no_run
/// use chart_playlist::{
///     Config, LogProgress, PlaylistAssembler, RawTrackRecord, SpotifyClient,
/// };
///
/// #[tokio::main]
/// async fn main() -> chart_playlist::Result<()> {
///     let config = Config::from_env()?;
///     let http_client = http_client::native::NativeClient::new();
///     let api = SpotifyClient::connect(Box::new(http_client), &config).await?;
///
///     let tracks = vec![RawTrackRecord::new("Hypnotized", "John Summit")];
///     let outcome = PlaylistAssembler::new(&api)
///         .create_playlist(&tracks, "My Chart", "Scraped chart", 30, &mut LogProgress)
///         .await;
///
///     if let Some(url) = outcome.playlist_url() {
///         println!("{url}");
///     }
///     Ok(())
/// }
/// ```
pub struct PlaylistAssembler<'a, A: PlaylistApi + ?Sized> {
    api: &'a A,
    batch_size: usize,
    concurrency: usize,
}

impl<'a, A: PlaylistApi + ?Sized> PlaylistAssembler<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            batch_size: MAX_ITEMS_PER_REQUEST,
            concurrency: 1,
        }
    }

    /// Keep up to `concurrency` searches in flight. Results stay in input
    /// order. Values below 1 are treated as 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Items per add request, clamped to `1..=MAX_ITEMS_PER_REQUEST`.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_ITEMS_PER_REQUEST);
        self
    }

    /// Resolve up to `limit` records and create a public playlist from the
    /// matches.
    ///
    /// No playlist is created when nothing matches. Only playlist calls can
    /// fail the run; search failures just leave a record unresolved.
    pub async fn create_playlist(
        &self,
        tracks: &[RawTrackRecord],
        name: &str,
        description: &str,
        limit: usize,
        handler: &mut dyn ProgressHandler,
    ) -> AssemblyOutcome {
        let mut outcome = AssemblyOutcome::empty();

        if tracks.is_empty() {
            log::warn!("No tracks data available to create a playlist");
            handler.handle_event(PipelineEvent::Finished { playlist_url: None });
            return outcome;
        }

        outcome.resolved = self.resolve_all(tracks, limit, handler).await;
        outcome.attempted = outcome.resolved.len();

        let ids = outcome.matched_ids();
        handler.handle_event(PipelineEvent::ResolutionSummary {
            attempted: outcome.attempted,
            resolved: ids.len(),
        });

        if ids.is_empty() {
            handler.handle_event(PipelineEvent::NoMatches {
                attempted: outcome.attempted,
            });
            handler.handle_event(PipelineEvent::Finished { playlist_url: None });
            return outcome;
        }

        let owner_id = match self.api.current_user_id().await {
            Ok(owner_id) => owner_id,
            Err(e) => return fail(outcome, "looking up the current user", e, handler),
        };

        let playlist = match self
            .api
            .create_playlist(&owner_id, name, true, description)
            .await
        {
            Ok(playlist) => playlist,
            Err(e) => return fail(outcome, "creating the playlist", e, handler),
        };
        handler.handle_event(PipelineEvent::PlaylistCreated {
            playlist: playlist.clone(),
        });
        let playlist_id = playlist.id.clone();
        outcome.playlist = Some(playlist);

        let mut total_added = 0;
        for (batch_index, batch) in ids.chunks(self.batch_size).enumerate() {
            if let Err(e) = self.api.add_items(&playlist_id, batch).await {
                let stage = format!("adding batch {}", batch_index + 1);
                return fail(outcome, &stage, e, handler);
            }

            total_added += batch.len();
            outcome.batches_added += 1;
            handler.handle_event(PipelineEvent::BatchAdded {
                batch: batch_index + 1,
                added: batch.len(),
                total_added,
            });
        }

        handler.handle_event(PipelineEvent::Finished {
            playlist_url: outcome.playlist_url().map(str::to_string),
        });
        outcome
    }

    async fn resolve_all(
        &self,
        tracks: &[RawTrackRecord],
        limit: usize,
        handler: &mut dyn ProgressHandler,
    ) -> Vec<ResolvedTrack> {
        let total = tracks.len().min(limit);
        let resolver = TrackResolver::new(self.api);
        let resolver = &resolver;
        let handler = RefCell::new(handler);
        let handler = &handler;

        // Records are pulled from the iterator only when a search slot frees up,
        // so `Resolving` goes out right before its search starts.
        let results = futures::stream::iter(tracks.iter().take(limit).enumerate())
            .map(|(position, record)| {
                handler.borrow_mut().handle_event(PipelineEvent::Resolving {
                    index: position + 1,
                    total,
                    record: record.clone(),
                });
                async move { resolver.resolve_record(record).await }
            })
            .buffered(self.concurrency);
        futures::pin_mut!(results);

        let mut resolved = Vec::with_capacity(total);
        while let Some(track) = results.next().await {
            let index = resolved.len() + 1;
            let query = track.search_query.clone();
            let event = match &track.resolution {
                Resolution::Matched(candidate) => PipelineEvent::Matched {
                    index,
                    query,
                    candidate: candidate.clone(),
                },
                Resolution::Unresolved(reason) => PipelineEvent::Unmatched {
                    index,
                    query,
                    error: match reason {
                        UnresolvedReason::NoMatch => None,
                        UnresolvedReason::SearchFailed(error) => Some(error.clone()),
                    },
                },
            };
            handler.borrow_mut().handle_event(event);

            resolved.push(track);
        }

        resolved
    }
}

fn fail(
    mut outcome: AssemblyOutcome,
    stage: &str,
    error: crate::ChartPlaylistError,
    handler: &mut dyn ProgressHandler,
) -> AssemblyOutcome {
    let error = error.to_string();
    handler.handle_event(PipelineEvent::Failed {
        stage: stage.to_string(),
        error: error.clone(),
    });
    handler.handle_event(PipelineEvent::Finished { playlist_url: None });
    outcome.failure = Some(format!("Error while {stage}: {error}"));
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockPlaylistApi;
    use crate::events::NoProgress;
    use crate::types::{SearchKind, TrackCandidate};
    use crate::ChartPlaylistError;
    use mockall::predicate::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingProgress {
        events: Vec<PipelineEvent>,
    }

    impl ProgressHandler for RecordingProgress {
        fn handle_event(&mut self, event: PipelineEvent) {
            self.events.push(event);
        }
    }

    fn playlist() -> PlaylistHandle {
        PlaylistHandle {
            id: "pl1".to_string(),
            name: "Chart".to_string(),
            external_url: "https://open.spotify.com/playlist/pl1".to_string(),
        }
    }

    /// Every search hits, with the query text as the id.
    fn echo_search(api: &mut MockPlaylistApi) {
        api.expect_search().returning(|query, _, _| {
            Ok(vec![TrackCandidate {
                id: query.to_string(),
                name: query.to_string(),
                primary_artist_name: String::new(),
            }])
        });
    }

    fn numbered_records(count: usize) -> Vec<RawTrackRecord> {
        (1..=count)
            .map(|i| RawTrackRecord::new(format!("Song {i}"), format!("Artist {i}")))
            .collect()
    }

    #[test_log::test(tokio::test)]
    async fn test_end_to_end_two_tracks_one_match() {
        let mut api = MockPlaylistApi::new();
        api.expect_search()
            .with(eq("track:Song artist:Bar"), eq(SearchKind::Track), eq(1u32))
            .returning(|_, _, _| {
                Ok(vec![TrackCandidate {
                    id: "X1".to_string(),
                    name: "Song".to_string(),
                    primary_artist_name: "Bar".to_string(),
                }])
            });
        api.expect_search()
            .with(eq("track:Nothing artist:Nobody"), always(), always())
            .returning(|_, _, _| Ok(vec![]));
        api.expect_current_user_id()
            .times(1)
            .returning(|| Ok("user1".to_string()));
        api.expect_create_playlist()
            .with(eq("user1"), eq("Chart"), eq(true), eq("desc"))
            .times(1)
            .returning(|_, _, _, _| Ok(playlist()));
        api.expect_add_items()
            .withf(|playlist_id, ids| playlist_id == "pl1" && ids == ["X1".to_string()])
            .times(1)
            .returning(|_, _| Ok(()));

        let tracks = vec![
            RawTrackRecord::new("Song (Radio Edit)", "Bar"),
            RawTrackRecord::new("Nothing", "Nobody"),
        ];

        let mut progress = RecordingProgress::default();
        let outcome = PlaylistAssembler::new(&api)
            .create_playlist(&tracks, "Chart", "desc", DEFAULT_LIMIT, &mut progress)
            .await;

        assert_eq!(outcome.attempted, 2);
        assert_eq!(outcome.matched_count(), 1);
        assert_eq!(outcome.batches_added, 1);
        assert_eq!(
            outcome.playlist_url(),
            Some("https://open.spotify.com/playlist/pl1")
        );
        assert_eq!(
            progress.events.last(),
            Some(&PipelineEvent::Finished {
                playlist_url: Some("https://open.spotify.com/playlist/pl1".to_string())
            })
        );
    }

    #[tokio::test]
    async fn test_no_playlist_when_nothing_matches() {
        let mut api = MockPlaylistApi::new();
        api.expect_search().returning(|_, _, _| Ok(vec![]));
        api.expect_current_user_id().never();
        api.expect_create_playlist().never();
        api.expect_add_items().never();

        let outcome = PlaylistAssembler::new(&api)
            .create_playlist(&numbered_records(3), "Chart", "", DEFAULT_LIMIT, &mut NoProgress)
            .await;

        assert_eq!(outcome.attempted, 3);
        assert_eq!(outcome.playlist, None);
        assert_eq!(outcome.playlist_url(), None);
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let mut api = MockPlaylistApi::new();
        api.expect_search().never();
        api.expect_current_user_id().never();

        let outcome = PlaylistAssembler::new(&api)
            .create_playlist(&[], "Chart", "", DEFAULT_LIMIT, &mut NoProgress)
            .await;

        assert_eq!(outcome.attempted, 0);
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_limit_keeps_first_records_in_order() {
        let mut api = MockPlaylistApi::new();
        echo_search(&mut api);
        api.expect_current_user_id()
            .returning(|| Ok("user1".to_string()));
        api.expect_create_playlist()
            .returning(|_, _, _, _| Ok(playlist()));

        let added = Arc::new(Mutex::new(Vec::<String>::new()));
        let added_clone = added.clone();
        api.expect_add_items().returning(move |_, ids| {
            added_clone.lock().unwrap().extend_from_slice(ids);
            Ok(())
        });

        let outcome = PlaylistAssembler::new(&api)
            .with_concurrency(4)
            .create_playlist(&numbered_records(100), "Chart", "", 30, &mut NoProgress)
            .await;

        let expected: Vec<String> = (1..=30)
            .map(|i| format!("track:Song {i} artist:Artist {i}"))
            .collect();
        assert_eq!(outcome.attempted, 30);
        assert_eq!(*added.lock().unwrap(), expected);
    }

    #[tokio::test]
    async fn test_ids_are_added_in_batches_of_one_hundred() {
        let mut api = MockPlaylistApi::new();
        echo_search(&mut api);
        api.expect_current_user_id()
            .returning(|| Ok("user1".to_string()));
        api.expect_create_playlist()
            .returning(|_, _, _, _| Ok(playlist()));

        let batches = Arc::new(Mutex::new(Vec::<Vec<String>>::new()));
        let batches_clone = batches.clone();
        api.expect_add_items().times(3).returning(move |_, ids| {
            batches_clone.lock().unwrap().push(ids.to_vec());
            Ok(())
        });

        let records = numbered_records(250);
        let outcome = PlaylistAssembler::new(&api)
            .create_playlist(&records, "Chart", "", 250, &mut NoProgress)
            .await;

        let batches = batches.lock().unwrap();
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
        assert_eq!(batches.concat(), outcome.matched_ids());
        assert_eq!(outcome.batches_added, 3);
        assert!(outcome.is_success());
    }

    #[test_log::test(tokio::test)]
    async fn test_failed_batch_keeps_earlier_batches_and_reports_failure() {
        let mut api = MockPlaylistApi::new();
        echo_search(&mut api);
        api.expect_current_user_id()
            .returning(|| Ok("user1".to_string()));
        api.expect_create_playlist()
            .times(1)
            .returning(|_, _, _, _| Ok(playlist()));

        let calls = Arc::new(Mutex::new(0usize));
        let calls_clone = calls.clone();
        api.expect_add_items().times(2).returning(move |_, _| {
            let mut calls = calls_clone.lock().unwrap();
            *calls += 1;
            if *calls == 1 {
                Ok(())
            } else {
                Err(ChartPlaylistError::Api {
                    status: 500,
                    message: "Server error".to_string(),
                })
            }
        });

        let mut progress = RecordingProgress::default();
        let outcome = PlaylistAssembler::new(&api)
            .create_playlist(&numbered_records(250), "Chart", "", 250, &mut progress)
            .await;

        assert_eq!(outcome.batches_added, 1);
        assert_eq!(outcome.playlist, Some(playlist()));
        assert_eq!(outcome.playlist_url(), None);
        assert!(outcome
            .failure
            .as_deref()
            .is_some_and(|failure| failure.contains("adding batch 2")));
        assert!(progress
            .events
            .iter()
            .any(|event| matches!(event, PipelineEvent::Failed { .. })));
    }

    /// Writes each event's kind into a log shared with the mocked search.
    struct SharedLogProgress(Arc<Mutex<Vec<String>>>);

    impl ProgressHandler for SharedLogProgress {
        fn handle_event(&mut self, event: PipelineEvent) {
            let entry = match event {
                PipelineEvent::Resolving { index, .. } => format!("resolving {index}"),
                PipelineEvent::Matched { index, query, .. } => format!("matched {index} {query}"),
                PipelineEvent::Unmatched { index, query, .. } => {
                    format!("unmatched {index} {query}")
                }
                _ => return,
            };
            self.0.lock().unwrap().push(entry);
        }
    }

    #[tokio::test]
    async fn test_resolving_event_precedes_its_search() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let search_log = log.clone();

        let mut api = MockPlaylistApi::new();
        api.expect_search().returning(move |query, _, _| {
            search_log.lock().unwrap().push(format!("search {query}"));
            if query.contains("Song 1") {
                Ok(vec![TrackCandidate {
                    id: "S1".to_string(),
                    name: "Song 1".to_string(),
                    primary_artist_name: "Artist 1".to_string(),
                }])
            } else {
                Ok(vec![])
            }
        });
        api.expect_current_user_id()
            .returning(|| Ok("user1".to_string()));
        api.expect_create_playlist()
            .returning(|_, _, _, _| Ok(playlist()));
        api.expect_add_items().returning(|_, _| Ok(()));

        let mut progress = SharedLogProgress(log.clone());
        let outcome = PlaylistAssembler::new(&api)
            .create_playlist(&numbered_records(2), "Chart", "", DEFAULT_LIMIT, &mut progress)
            .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.resolved[1].search_query, "track:Song 2 artist:Artist 2");
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "resolving 1",
                "search track:Song 1 artist:Artist 1",
                "matched 1 track:Song 1 artist:Artist 1",
                "resolving 2",
                "search track:Song 2 artist:Artist 2",
                "unmatched 2 track:Song 2 artist:Artist 2",
            ]
        );
    }

    #[tokio::test]
    async fn test_search_errors_do_not_stop_the_batch() {
        let mut api = MockPlaylistApi::new();
        api.expect_search()
            .with(eq("track:Song 1 artist:Artist 1"), always(), always())
            .returning(|_, _, _| Err(ChartPlaylistError::Http("timeout".to_string())));
        api.expect_search()
            .with(eq("track:Song 2 artist:Artist 2"), always(), always())
            .returning(|_, _, _| {
                Ok(vec![TrackCandidate {
                    id: "S2".to_string(),
                    name: "Song 2".to_string(),
                    primary_artist_name: "Artist 2".to_string(),
                }])
            });
        api.expect_current_user_id()
            .returning(|| Ok("user1".to_string()));
        api.expect_create_playlist()
            .returning(|_, _, _, _| Ok(playlist()));
        api.expect_add_items()
            .withf(|_, ids| ids == ["S2".to_string()])
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = PlaylistAssembler::new(&api)
            .create_playlist(&numbered_records(2), "Chart", "", DEFAULT_LIMIT, &mut NoProgress)
            .await;

        assert!(outcome.is_success());
        assert!(matches!(
            outcome.resolved[0].resolution,
            Resolution::Unresolved(UnresolvedReason::SearchFailed(_))
        ));
    }
}
