use super::utils::{save_listing, scrape_chart};
use super::ChartOptions;
use std::path::PathBuf;

/// Scrape a chart and print its records, one per line.
pub async fn handle_scrape(
    options: ChartOptions,
    output_dir: PathBuf,
    debug_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let scraped = scrape_chart(&options, debug_dir).await?;
    save_listing(&output_dir, &scraped, options.no_save);

    if options.json {
        eprintln!("{}", serde_json::to_string(&scraped.outcome)?);
        for record in &scraped.records {
            println!("{}", serde_json::to_string(record)?);
        }
    } else {
        eprintln!("{}", scraped.labels.heading);
        eprintln!("{} ({})", scraped.kind, scraped.outcome);
        eprintln!();
        for (index, record) in scraped.records.iter().enumerate() {
            println!("{}. {record}", index + 1);
        }
    }

    Ok(())
}
