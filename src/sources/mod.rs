//! Chart source adapters.
//!
//! Each adapter fetches one chart, extracts an ordered list of
//! [`RawTrackRecord`]s with source-specific selectors and keeps them until the
//! next [`ChartSource::scrape`] call. Fetch and parse failures never escape an
//! adapter: they are logged and reported through [`ScrapeOutcome`].

pub mod apple_music;
pub mod billboard;
pub mod soundcloud;
pub mod traxsource;

pub use apple_music::AppleMusicEdm;
pub use billboard::BillboardHot100;
pub use soundcloud::SoundCloudTop;
pub use traxsource::TraxsourceDeepHouse;

use crate::fetch::PageFetcher;
use crate::types::{ChartLabels, RawTrackRecord, ScrapeOutcome};
use async_trait::async_trait;
use chrono::NaiveDate;
use scraper::ElementRef;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A chart that can be scraped into raw track records.
///
/// # Examples
///
/// ```rust,no_run
/// use chart_playlist::{ChartKind, ChartSource, HttpPageFetcher};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let fetcher = Arc::new(HttpPageFetcher::new(Box::new(http_client::native::NativeClient::new())));
/// let mut source = ChartKind::Billboard.create(fetcher, None);
///
/// let outcome = source.scrape(Some("2021-01-02")).await;
/// if outcome.success {
///     for record in source.tracks_data() {
///         println!("{record}");
///     }
/// }
/// # });
/// ```
#[async_trait(?Send)]
pub trait ChartSource {
    /// Display name of the chart.
    fn name(&self) -> &str;

    /// Genre label of the chart.
    fn genre(&self) -> &str;

    /// Fetch the chart and replace any previously held records.
    ///
    /// `param` is source specific: the chart date for Billboard, an optional
    /// extra URL path segment for Apple Music and Traxsource, ignored for
    /// SoundCloud. On failure the adapter holds no records.
    async fn scrape(&mut self, param: Option<&str>) -> ScrapeOutcome;

    /// Records from the last scrape, in chart order.
    fn tracks_data(&self) -> &[RawTrackRecord];

    /// File name, heading and playlist defaults for a run.
    fn labels(&self, param: Option<&str>, today: NaiveDate) -> ChartLabels;
}

/// The charts this crate knows how to scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Billboard Hot 100 for a given week (historical)
    Billboard,
    /// Apple Music "EDM Hits" playlist
    AppleMusicEdm,
    /// SoundCloud top chart for a genre
    SoundCloudEdm,
    /// Traxsource deep house top tracks
    TraxsourceDeepHouse,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Billboard,
        ChartKind::AppleMusicEdm,
        ChartKind::SoundCloudEdm,
        ChartKind::TraxsourceDeepHouse,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ChartKind::Billboard => "billboard",
            ChartKind::AppleMusicEdm => "apple-music-edm",
            ChartKind::SoundCloudEdm => "soundcloud-edm",
            ChartKind::TraxsourceDeepHouse => "traxsource-deep-house",
        }
    }

    /// Whether the chart needs a `YYYY-MM-DD` date parameter.
    pub fn requires_date(&self) -> bool {
        matches!(self, ChartKind::Billboard)
    }

    /// Build the adapter for this chart.
    ///
    /// `genre` only applies to SoundCloud and defaults to `danceedm`.
    pub fn create(
        &self,
        fetcher: Arc<dyn PageFetcher>,
        genre: Option<String>,
    ) -> Box<dyn ChartSource> {
        match self {
            ChartKind::Billboard => Box::new(BillboardHot100::new(fetcher)),
            ChartKind::AppleMusicEdm => Box::new(AppleMusicEdm::new(fetcher)),
            ChartKind::SoundCloudEdm => Box::new(SoundCloudTop::new(
                fetcher,
                genre.unwrap_or_else(|| soundcloud::DEFAULT_GENRE.to_string()),
            )),
            ChartKind::TraxsourceDeepHouse => Box::new(TraxsourceDeepHouse::new(fetcher)),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChartKind::Billboard => "Billboard Hot 100 (historical)",
            ChartKind::AppleMusicEdm => "Apple Music EDM Hits",
            ChartKind::SoundCloudEdm => "SoundCloud Top EDM",
            ChartKind::TraxsourceDeepHouse => "Traxsource Top Deep House",
        };
        f.write_str(label)
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == wanted)
            .ok_or_else(|| format!("Unknown chart '{s}'"))
    }
}

/// Trimmed text content of an element.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_kind_from_str() {
        assert_eq!("billboard".parse::<ChartKind>(), Ok(ChartKind::Billboard));
        assert_eq!(
            " Traxsource-Deep-House ".parse::<ChartKind>(),
            Ok(ChartKind::TraxsourceDeepHouse)
        );
        assert!("spotify".parse::<ChartKind>().is_err());
    }

    #[test]
    fn test_only_billboard_requires_date() {
        let dated: Vec<_> = ChartKind::ALL
            .into_iter()
            .filter(ChartKind::requires_date)
            .collect();
        assert_eq!(dated, vec![ChartKind::Billboard]);
    }
}
