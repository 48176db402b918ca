mod commands;

use clap::Parser;
use commands::{execute_command, Commands};

/// Build streaming playlists from music charts
#[derive(Parser)]
#[command(
    name = "chart-playlist",
    about = "Scrape a music chart and turn it into a Spotify playlist",
    long_about = None
)]
struct Cli {
    /// Show detailed debug information
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER),
    );
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    if let Err(e) = execute_command(args.command).await {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }

    Ok(())
}
