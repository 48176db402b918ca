//! Plain-text track listings written next to each run.

use crate::types::RawTrackRecord;
use crate::Result;
use std::fs;
use std::path::Path;

/// Render a heading, a blank line and one numbered line per record.
///
/// ```rust
/// use chart_playlist::listing::format_track_listing;
/// use chart_playlist::{Rank, RawTrackRecord};
///
/// let records = vec![
///     RawTrackRecord::ranked(Rank::Position(1), "Flowers", "Miley Cyrus"),
///     RawTrackRecord::new("Beat Of An Era", "Jimpster"),
/// ];
/// assert_eq!(
///     format_track_listing("Chart", &records),
///     "Chart\n\n1. #1: Flowers - Miley Cyrus\n2. Beat Of An Era - Jimpster\n"
/// );
/// ```
pub fn format_track_listing(heading: &str, records: &[RawTrackRecord]) -> String {
    let mut listing = format!("{heading}\n\n");
    for (index, record) in records.iter().enumerate() {
        listing.push_str(&format!("{}. {record}\n", index + 1));
    }
    listing
}

/// Write the listing to `path`, creating parent directories as needed.
///
/// Nothing is written for an empty record list.
pub fn save_tracks_to_file(path: &Path, heading: &str, records: &[RawTrackRecord]) -> Result<()> {
    if records.is_empty() {
        log::info!("No track data to save");
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, format_track_listing(heading, records))?;
    log::info!("Track information saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rank;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("chart-playlist-listing-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_format_rank_not_available() {
        let records = vec![RawTrackRecord::ranked(Rank::NotAvailable, "Song", "Artist")];
        assert_eq!(
            format_track_listing("Heading", &records),
            "Heading\n\n1. #N/A: Song - Artist\n"
        );
    }

    #[test]
    fn test_save_writes_listing() {
        let path = temp_path("billboard_hot100_2021-01-02.txt");
        let records = vec![RawTrackRecord::ranked(Rank::Position(1), "Mood", "24kGoldn")];

        save_tracks_to_file(&path, "Billboard Hot 100 Songs for 2021-01-02", &records).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "Billboard Hot 100 Songs for 2021-01-02\n\n1. #1: Mood - 24kGoldn\n"
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_skips_empty_records() {
        let path = temp_path("empty.txt");
        save_tracks_to_file(&path, "Nothing", &[]).unwrap();
        assert!(!path.exists());
    }
}
