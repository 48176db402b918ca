use super::build_output::{HumanReadableBuildHandler, JsonBuildHandler};
use super::utils::{ask_for_confirmation, prompt_line, save_listing, scrape_chart};
use super::ChartOptions;
use chart_playlist::{Config, PlaylistAssembler, ProgressHandler, SpotifyClient};

pub struct BuildRequest {
    pub chart: ChartOptions,
    pub name: Option<String>,
    pub description: Option<String>,
    pub limit: usize,
    pub concurrency: usize,
    pub yes: bool,
}

/// Scrape a chart, resolve its entries and create the playlist.
pub async fn handle_build(request: BuildRequest) -> Result<(), Box<dyn std::error::Error>> {
    // Credentials are checked before anything is fetched
    let config = Config::from_env()?;

    let scraped = scrape_chart(&request.chart, config.debug_dir.clone()).await?;
    eprintln!(
        "📋 {}: {} tracks ({})",
        scraped.kind, scraped.outcome.record_count, scraped.outcome.message
    );
    save_listing(&config.output_dir, &scraped, request.chart.no_save);

    let name = match request.name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        Some(_) => scraped.labels.playlist_name.clone(),
        None => {
            let answer = prompt_line(&format!(
                "What do you want to name your playlist? [{}] ",
                scraped.labels.playlist_name
            ))?;
            if answer.is_empty() {
                scraped.labels.playlist_name.clone()
            } else {
                answer
            }
        }
    };
    let description = request
        .description
        .unwrap_or_else(|| scraped.labels.description.clone());

    let considered = scraped.records.len().min(request.limit);
    if !request.yes
        && !ask_for_confirmation(&format!(
            "\nCreate public playlist '{name}' from the first {considered} of {} tracks?",
            scraped.records.len()
        ))?
    {
        log::info!("Playlist creation cancelled by user");
        eprintln!("Cancelled.");
        return Ok(());
    }

    let http_client = http_client::native::NativeClient::new();
    let api = SpotifyClient::connect(Box::new(http_client), &config).await?;

    let mut handler: Box<dyn ProgressHandler> = if request.chart.json {
        Box::new(JsonBuildHandler)
    } else {
        Box::new(HumanReadableBuildHandler)
    };

    let outcome = PlaylistAssembler::new(&api)
        .with_concurrency(request.concurrency)
        .create_playlist(
            &scraped.records,
            &name,
            &description,
            request.limit,
            handler.as_mut(),
        )
        .await;

    if outcome.is_success() {
        return Ok(());
    }

    match outcome.failure {
        Some(failure) => Err(failure.into()),
        None => Err("No playlist created: none of the tracks were found".into()),
    }
}
