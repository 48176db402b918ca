use super::ChartOptions;
use chart_playlist::listing::save_tracks_to_file;
use chart_playlist::{
    ChartKind, ChartLabels, HttpPageFetcher, RawTrackRecord, ScrapeOutcome,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A chart scraped successfully, with everything needed to save or build from it.
pub struct ScrapedChart {
    pub kind: ChartKind,
    pub outcome: ScrapeOutcome,
    pub records: Vec<RawTrackRecord>,
    pub labels: ChartLabels,
}

/// Ask for user confirmation (goes to stderr)
pub fn ask_for_confirmation(message: &str) -> Result<bool, Box<dyn std::error::Error>> {
    eprint!("{message} (y/N): ");
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// Print a prompt to stderr and read one trimmed line from stdin
pub fn prompt_line(message: &str) -> Result<String, Box<dyn std::error::Error>> {
    eprint!("{message}");
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Check the `YYYY-MM-DD` shape of a chart date.
///
/// Only the token lengths are checked, not whether the date exists.
pub fn validate_chart_date(date: &str) -> Result<(), String> {
    let parts: Vec<&str> = date.trim().split('-').collect();
    let shape_ok = parts.len() == 3
        && parts[0].len() == 4
        && parts[1].len() == 2
        && parts[2].len() == 2;

    if shape_ok {
        Ok(())
    } else {
        Err(format!(
            "Invalid date '{date}'. Please use the format YYYY-MM-DD"
        ))
    }
}

fn prompt_for_chart() -> Result<ChartKind, Box<dyn std::error::Error>> {
    eprintln!("Available charts:");
    for (index, kind) in ChartKind::ALL.iter().enumerate() {
        eprintln!("  {}. {kind} ({})", index + 1, kind.slug());
    }

    let answer = prompt_line("Which chart do you want to use? ")?;
    if let Ok(number) = answer.parse::<usize>() {
        if let Some(kind) = number.checked_sub(1).and_then(|i| ChartKind::ALL.get(i)) {
            return Ok(*kind);
        }
    }
    Ok(answer.parse::<ChartKind>()?)
}

fn prompt_for_date() -> Result<String, Box<dyn std::error::Error>> {
    let date = prompt_line("Which year do you want to travel to? Use the format YYYY-MM-DD: ")?;
    validate_chart_date(&date)?;
    Ok(date)
}

/// Work out the source parameter: the date for Billboard, the extra path for
/// Apple Music and Traxsource, nothing for SoundCloud.
fn chart_param(
    kind: ChartKind,
    options: &ChartOptions,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    match kind {
        ChartKind::Billboard => {
            let date = match &options.date {
                Some(date) => {
                    validate_chart_date(date)?;
                    date.trim().to_string()
                }
                None => prompt_for_date()?,
            };
            Ok(Some(date))
        }
        ChartKind::AppleMusicEdm | ChartKind::TraxsourceDeepHouse => Ok(options.path.clone()),
        ChartKind::SoundCloudEdm => Ok(None),
    }
}

/// Scrape the chart selected by `options`, prompting for anything missing.
///
/// Fails when the source reports failure, or when it served fallback data and
/// `--reject-fallback` was given.
pub async fn scrape_chart(
    options: &ChartOptions,
    debug_dir: Option<PathBuf>,
) -> Result<ScrapedChart, Box<dyn std::error::Error>> {
    let kind = match options.chart {
        Some(chart) => chart.into(),
        None => prompt_for_chart()?,
    };
    let param = chart_param(kind, options)?;

    let http_client = http_client::native::NativeClient::new();
    let fetcher = Arc::new(HttpPageFetcher::new(Box::new(http_client)).with_debug_dir(debug_dir));

    let mut source = kind.create(fetcher, Some(options.genre.clone()));
    log::info!("Scraping {}", source.name());

    let outcome = source.scrape(param.as_deref()).await;
    if !outcome.success {
        return Err(format!("Scraping {kind} failed: {}", outcome.message).into());
    }

    if outcome.is_fallback {
        if options.reject_fallback {
            return Err(format!(
                "{kind} returned built-in substitute data instead of the live chart: {}",
                outcome.message
            )
            .into());
        }
        eprintln!(
            "⚠️  {kind} could not be read live; continuing with its built-in substitute list"
        );
    }

    let today = chrono::Local::now().date_naive();
    Ok(ScrapedChart {
        kind,
        labels: source.labels(param.as_deref(), today),
        records: source.tracks_data().to_vec(),
        outcome,
    })
}

/// Write the listing file into `output_dir` unless disabled.
pub fn save_listing(output_dir: &Path, scraped: &ScrapedChart, no_save: bool) {
    if no_save {
        return;
    }

    let path = output_dir.join(&scraped.labels.file_name);
    if let Err(e) = save_tracks_to_file(&path, &scraped.labels.heading, &scraped.records) {
        eprintln!("⚠️  Warning: Failed to save track listing: {e}");
    }
}
