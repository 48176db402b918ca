use chart_playlist::{PipelineEvent, ProgressHandler};

/// Default output handler for the build command
/// Progress goes to stderr, the playlist URL to stdout
pub struct HumanReadableBuildHandler;

impl ProgressHandler for HumanReadableBuildHandler {
    fn handle_event(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::Resolving {
                index,
                total,
                record,
            } => {
                eprintln!("({index}/{total}) Searching for: {record}");
            }
            PipelineEvent::Matched { candidate, .. } => {
                eprintln!("   ✅ Found: {candidate}");
            }
            PipelineEvent::Unmatched { query, error, .. } => match error {
                Some(error) => eprintln!("   ❌ Search failed for {query}: {error}"),
                None => eprintln!("   ❌ No results found for {query}"),
            },
            PipelineEvent::ResolutionSummary {
                attempted,
                resolved,
            } => {
                eprintln!();
                eprintln!("Found {resolved} of {attempted} tracks on Spotify");
            }
            PipelineEvent::NoMatches { .. } => {
                eprintln!("No songs found to add to playlist.");
            }
            PipelineEvent::PlaylistCreated { playlist } => {
                eprintln!("📀 Created playlist: {}", playlist.name);
            }
            PipelineEvent::BatchAdded { added, .. } => {
                eprintln!("   Added {added} songs to playlist");
            }
            PipelineEvent::Failed { stage, error } => {
                eprintln!("❌ Error while {stage}: {error}");
            }
            PipelineEvent::Finished { playlist_url } => {
                if let Some(url) = playlist_url {
                    println!("{url}");
                }
            }
        }
    }
}

/// JSON output handler for the build command
/// Every event goes to stdout as one JSON object per line
pub struct JsonBuildHandler;

impl ProgressHandler for JsonBuildHandler {
    fn handle_event(&mut self, event: PipelineEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize event to JSON: {e}"),
        }
    }
}
