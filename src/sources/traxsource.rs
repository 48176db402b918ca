//! Traxsource deep house top tracks.

use super::{element_text, ChartSource};
use crate::fetch::{PageFetcher, PageRequest};
use crate::types::{ChartLabels, RawTrackRecord, ScrapeOutcome};
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use scraper::{Html, Selector};
use std::sync::Arc;

pub const BASE_URL: &str = "https://www.traxsource.com/genre/13/deep-house/top";

/// Served when the chart cannot be fetched or yields no tracks.
pub const FALLBACK_TRACKS: [(&str, &str); 10] = [
    ("Beat Of An Era", "Jimpster"),
    ("Whistle Me (Fouk Remix)", "Elisa Elisa"),
    ("Grooveline (Extended Mix)", "T.Markakis"),
    ("Casey Screams", "Megatronic"),
    ("Forbidden Experience", "The Deepshakerz"),
    ("Tudo Bem (Original Mix)", "Pablo Fierro"),
    ("In The Morning", "Frag Maddin"),
    ("Winter Blues (Original Mix)", "Fred Everything"),
    ("All Goes Down", "Soledrifter"),
    ("Queens Speech (Original Mix)", "Demuir"),
];

pub struct TraxsourceDeepHouse {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
    tracks: Vec<RawTrackRecord>,
}

impl TraxsourceDeepHouse {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_base_url(fetcher, BASE_URL.to_string())
    }

    pub fn with_base_url(fetcher: Arc<dyn PageFetcher>, base_url: String) -> Self {
        Self {
            fetcher,
            base_url,
            tracks: Vec::new(),
        }
    }

    fn page_request(&self, param: Option<&str>) -> PageRequest {
        let url = match param.map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) => format!("{}/{}", self.base_url, path.trim_start_matches('/')),
            None => self.base_url.clone(),
        };

        PageRequest::new(url)
            .with_header("Accept-Language", "en-US,en;q=0.9")
            .with_header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.8,*/*;q=0.7",
            )
            .with_header("Referer", "https://www.traxsource.com/")
    }

    async fn fetch_document(&self, param: Option<&str>) -> Result<Html> {
        let request = self.page_request(param);
        log::info!("Fetching Traxsource Deep House top tracks from: {}", request.url);
        let page = self.fetcher.fetch(&request).await?.error_for_status()?;
        Ok(Html::parse_document(&page.body))
    }

    fn use_fallback(&mut self, reason: &str) -> ScrapeOutcome {
        log::warn!("{reason}; using fallback track list");
        self.tracks = FALLBACK_TRACKS
            .iter()
            .map(|(title, artist)| RawTrackRecord::new(*title, *artist))
            .collect();
        ScrapeOutcome::fallback(
            self.tracks.len(),
            format!("{reason}; using the built-in deep house list"),
        )
    }
}

#[async_trait(?Send)]
impl ChartSource for TraxsourceDeepHouse {
    fn name(&self) -> &str {
        "Traxsource Top Deep House"
    }

    fn genre(&self) -> &str {
        "deep-house"
    }

    async fn scrape(&mut self, param: Option<&str>) -> ScrapeOutcome {
        self.tracks.clear();

        let document = match self.fetch_document(param).await {
            Ok(document) => document,
            Err(e) => {
                log::error!("Error fetching data from Traxsource: {e}");
                return self.use_fallback(&format!("Error fetching data from Traxsource: {e}"));
            }
        };

        self.tracks = parse_chart(&document);

        if self.tracks.is_empty() {
            return self.use_fallback("No tracks extracted from the Traxsource page");
        }

        log::info!("Found {} tracks", self.tracks.len());
        ScrapeOutcome::extracted(
            self.tracks.len(),
            format!("Found {} tracks", self.tracks.len()),
        )
    }

    fn tracks_data(&self) -> &[RawTrackRecord] {
        &self.tracks
    }

    fn labels(&self, _param: Option<&str>, today: NaiveDate) -> ChartLabels {
        let today = today.format("%Y-%m-%d");
        ChartLabels {
            file_name: format!("traxsource_deep_house_{today}.txt"),
            heading: format!("Traxsource Top Deep House Tracks - {today}"),
            playlist_name: format!("Traxsource Top Deep House - {today}"),
            description: format!("Traxsource top deep house tracks as of {today}"),
        }
    }
}

/// Build the display title from the title, version tag and remixer credits.
///
/// ```rust
/// use chart_playlist::sources::traxsource::compose_title;
///
/// assert_eq!(compose_title("Whistle Me", "", &["Fouk".to_string()]), "Whistle Me (Fouk Remix)");
/// assert_eq!(compose_title("Tudo Bem", "Original Mix", &[]), "Tudo Bem (Original Mix)");
/// ```
pub fn compose_title(title: &str, version: &str, remixers: &[String]) -> String {
    let mut full_title = if version.is_empty() {
        title.to_string()
    } else {
        format!("{title} ({version})")
    };

    if !remixers.is_empty() && !version.to_lowercase().contains("remix") {
        full_title = format!("{full_title} ({} Remix)", remixers.join(", "));
    }

    full_title
}

/// Extract records from `div.trk-row` rows.
///
/// The version tag has its trailing duration cut off. Rows without a title or
/// without any artist are skipped.
pub fn parse_chart(document: &Html) -> Vec<RawTrackRecord> {
    let row_selector = Selector::parse("div.trk-row").unwrap();
    let title_selector = Selector::parse("div.title a").unwrap();
    let version_selector = Selector::parse("div.title span.version").unwrap();
    let artist_selector = Selector::parse("div.artists a.com-artists").unwrap();
    let remixer_selector = Selector::parse("div.artists a.com-remixers").unwrap();

    let rows: Vec<_> = document.select(&row_selector).collect();
    log::debug!("Found {} track elements", rows.len());

    let mut records = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let title = row
            .select(&title_selector)
            .next()
            .map(|e| element_text(&e))
            .unwrap_or_default();

        let version = row
            .select(&version_selector)
            .next()
            .map(|e| {
                let text = element_text(&e);
                match text.split_once('(') {
                    Some((before, _)) => before.trim().to_string(),
                    None => text,
                }
            })
            .unwrap_or_default();

        let artists: Vec<String> = row.select(&artist_selector).map(|e| element_text(&e)).collect();
        let remixers: Vec<String> = row
            .select(&remixer_selector)
            .map(|e| element_text(&e))
            .collect();

        if title.is_empty() || artists.is_empty() {
            log::debug!("Couldn't extract title or artist from track {}", index + 1);
            continue;
        }

        records.push(RawTrackRecord::new(
            compose_title(&title, &version, &remixers),
            artists.join(", "),
        ));
    }

    records
}
