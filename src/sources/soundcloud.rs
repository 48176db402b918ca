//! SoundCloud top chart for a genre.

use super::{element_text, ChartSource};
use crate::fetch::{PageFetcher, PageRequest};
use crate::types::{ChartLabels, RawTrackRecord, ScrapeOutcome};
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use scraper::{Html, Selector};
use std::sync::Arc;

pub const BASE_URL: &str = "https://soundcloud.com/charts/top";
pub const DEFAULT_GENRE: &str = "danceedm";

/// Scraper for `soundcloud.com/charts/top?genre=<genre>`.
///
/// There is no fallback list. A page without chart items, or whose items have
/// no readable title and artist, is a failure.
pub struct SoundCloudTop {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
    genre: String,
    tracks: Vec<RawTrackRecord>,
}

impl SoundCloudTop {
    pub fn new(fetcher: Arc<dyn PageFetcher>, genre: impl Into<String>) -> Self {
        Self::with_base_url(fetcher, genre, BASE_URL.to_string())
    }

    pub fn with_base_url(
        fetcher: Arc<dyn PageFetcher>,
        genre: impl Into<String>,
        base_url: String,
    ) -> Self {
        Self {
            fetcher,
            base_url,
            genre: genre.into(),
            tracks: Vec::new(),
        }
    }

    fn chart_url(&self) -> String {
        format!(
            "{}?genre={}",
            self.base_url,
            urlencoding::encode(&self.genre)
        )
    }

    async fn fetch_document(&self) -> Result<Html> {
        let url = self.chart_url();
        log::info!("Fetching data from: {url}");
        let page = self
            .fetcher
            .fetch(&PageRequest::new(url))
            .await?
            .error_for_status()?;
        Ok(Html::parse_document(&page.body))
    }
}

#[async_trait(?Send)]
impl ChartSource for SoundCloudTop {
    fn name(&self) -> &str {
        "SoundCloud Top"
    }

    fn genre(&self) -> &str {
        &self.genre
    }

    async fn scrape(&mut self, _param: Option<&str>) -> ScrapeOutcome {
        self.tracks.clear();

        let document = match self.fetch_document().await {
            Ok(document) => document,
            Err(e) => {
                log::error!("Error scraping SoundCloud: {e}");
                return ScrapeOutcome::failed(format!("Error scraping SoundCloud: {e}"));
            }
        };

        let item_selector = Selector::parse("li article").unwrap();
        let item_count = document.select(&item_selector).count();
        log::info!("Found {item_count} tracks in the chart");

        if item_count == 0 {
            return ScrapeOutcome::failed(format!(
                "No chart items found for genre '{}'. The SoundCloud page structure might have changed.",
                self.genre
            ));
        }

        self.tracks = parse_chart(&document);

        if self.tracks.is_empty() {
            return ScrapeOutcome::failed(format!(
                "Found {item_count} chart items but none had a title and artist"
            ));
        }

        log::info!(
            "Successfully extracted data for {} tracks",
            self.tracks.len()
        );
        ScrapeOutcome::extracted(
            self.tracks.len(),
            format!("Extracted {} {} tracks", self.tracks.len(), self.genre),
        )
    }

    fn tracks_data(&self) -> &[RawTrackRecord] {
        &self.tracks
    }

    fn labels(&self, _param: Option<&str>, _today: NaiveDate) -> ChartLabels {
        let genre = capitalize(&self.genre);
        ChartLabels {
            file_name: format!("soundcloud_{}_top.txt", self.genre),
            heading: format!("SoundCloud {genre} Top Tracks"),
            playlist_name: format!("SoundCloud {genre} Top"),
            description: format!("Top SoundCloud {genre} tracks"),
        }
    }
}

/// Extract records from `li article` chart items.
///
/// The item heading holds two links: the track (`itemprop="url"`) and then the
/// uploader, used as the artist.
pub fn parse_chart(document: &Html) -> Vec<RawTrackRecord> {
    let item_selector = Selector::parse("li article").unwrap();
    let heading_selector = Selector::parse(r#"h2[itemprop="name"]"#).unwrap();
    let title_selector = Selector::parse(r#"a[itemprop="url"]"#).unwrap();
    let artist_selector = Selector::parse("a:nth-of-type(2)").unwrap();

    let mut records = Vec::new();
    for item in document.select(&item_selector) {
        let Some(heading) = item.select(&heading_selector).next() else {
            continue;
        };

        let title = heading.select(&title_selector).next();
        let artist = heading.select(&artist_selector).next();

        if let (Some(title), Some(artist)) = (title, artist) {
            let title = element_text(&title);
            let artist = element_text(&artist);
            if title.is_empty() {
                log::debug!("Skipping chart item without a title");
                continue;
            }
            log::debug!("Found track: {title} by {artist}");
            records.push(RawTrackRecord::new(title, artist));
        }
    }

    records
}

/// Uppercase the first character and lowercase the rest.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
