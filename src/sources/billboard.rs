//! Billboard Hot 100 for a past chart week.

use super::{element_text, ChartSource};
use crate::fetch::{PageFetcher, PageRequest};
use crate::types::{ChartLabels, Rank, RawTrackRecord, ScrapeOutcome};
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use scraper::{Html, Selector};
use std::sync::Arc;

pub const BASE_URL: &str = "https://www.billboard.com/charts/hot-100";

/// Scraper for the Billboard Hot 100 of a given week.
///
/// Records are ranked. There is no fallback list: a page without chart rows is
/// a failure.
pub struct BillboardHot100 {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
    tracks: Vec<RawTrackRecord>,
}

impl BillboardHot100 {
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

    async fn fetch_document(&self, target_date: &str) -> Result<Html> {
        let url = format!("{}/{}", self.base_url, target_date);
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
impl ChartSource for BillboardHot100 {
    fn name(&self) -> &str {
        "Billboard Hot 100"
    }

    fn genre(&self) -> &str {
        "hot-100"
    }

    async fn scrape(&mut self, param: Option<&str>) -> ScrapeOutcome {
        self.tracks.clear();

        let Some(target_date) = param else {
            return ScrapeOutcome::failed("A chart date (YYYY-MM-DD) is required for Billboard");
        };

        let document = match self.fetch_document(target_date).await {
            Ok(document) => document,
            Err(e) => {
                log::error!("Error scraping Billboard Hot 100: {e}");
                return ScrapeOutcome::failed(format!("Error scraping Billboard Hot 100: {e}"));
            }
        };

        self.tracks = parse_chart(&document);

        if self.tracks.is_empty() {
            log::warn!("No chart rows found for {target_date}");
            return ScrapeOutcome::failed(
                "No chart rows found. The Billboard Hot 100 page structure might have changed.",
            );
        }

        log::info!("Extracted data for {} songs", self.tracks.len());
        ScrapeOutcome::extracted(
            self.tracks.len(),
            format!("Extracted {} songs for {target_date}", self.tracks.len()),
        )
    }

    fn tracks_data(&self) -> &[RawTrackRecord] {
        &self.tracks
    }

    fn labels(&self, param: Option<&str>, _today: NaiveDate) -> ChartLabels {
        let date = param.unwrap_or("unknown-date");
        ChartLabels {
            file_name: format!("billboard_hot100_{date}.txt"),
            heading: format!("Billboard Hot 100 Songs for {date}"),
            playlist_name: format!("Billboard Hot 100 - {date}"),
            description: format!("Billboard Hot 100 songs for {date}"),
        }
    }
}

/// Extract ranked records from a Hot 100 chart page.
///
/// Rows without both a title and an artist element are skipped. A row without
/// a rank element keeps its place with [`Rank::NotAvailable`].
pub fn parse_chart(document: &Html) -> Vec<RawTrackRecord> {
    let row_selector = Selector::parse("ul.o-chart-results-list-row").unwrap();
    let title_selector = Selector::parse("h3.c-title").unwrap();
    let artist_selector = Selector::parse("span.c-label.a-no-trucate").unwrap();
    let rank_selector = Selector::parse("span.c-label.a-font-primary-bold-l").unwrap();

    let rows: Vec<_> = document.select(&row_selector).collect();
    log::debug!("Found {} chart rows", rows.len());

    let mut records = Vec::new();
    for row in rows {
        let title = row.select(&title_selector).next().map(|e| element_text(&e));
        let artist = row.select(&artist_selector).next().map(|e| element_text(&e));

        let (Some(title), Some(artist)) = (title, artist) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }

        let rank = row
            .select(&rank_selector)
            .next()
            .map(|e| Rank::parse(&element_text(&e)))
            .unwrap_or(Rank::NotAvailable);

        records.push(RawTrackRecord::ranked(rank, title, artist));
    }

    records
}
