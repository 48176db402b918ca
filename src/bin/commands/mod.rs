pub mod build;
pub mod build_output;
pub mod scrape;
pub mod utils;

use chart_playlist::ChartKind;
use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartArg {
    /// Billboard Hot 100 for a past week (needs --date)
    Billboard,
    /// Apple Music "EDM Hits" playlist
    AppleMusicEdm,
    /// SoundCloud top chart (see --genre)
    SoundcloudEdm,
    /// Traxsource top deep house tracks
    TraxsourceDeepHouse,
}

impl From<ChartArg> for ChartKind {
    fn from(arg: ChartArg) -> Self {
        match arg {
            ChartArg::Billboard => ChartKind::Billboard,
            ChartArg::AppleMusicEdm => ChartKind::AppleMusicEdm,
            ChartArg::SoundcloudEdm => ChartKind::SoundCloudEdm,
            ChartArg::TraxsourceDeepHouse => ChartKind::TraxsourceDeepHouse,
        }
    }
}

/// Options shared by every command that scrapes a chart.
#[derive(Args, Clone, Debug)]
pub struct ChartOptions {
    /// Chart to scrape (prompted for when omitted)
    #[arg(long, value_enum)]
    pub chart: Option<ChartArg>,

    /// Chart week for Billboard, as YYYY-MM-DD (prompted for when omitted)
    #[arg(long)]
    pub date: Option<String>,

    /// SoundCloud genre
    #[arg(long, default_value = chart_playlist::sources::soundcloud::DEFAULT_GENRE)]
    pub genre: String,

    /// Extra URL path appended to the Apple Music or Traxsource chart URL
    #[arg(long)]
    pub path: Option<String>,

    /// Fail instead of continuing with a built-in substitute track list
    #[arg(long)]
    pub reject_fallback: bool,

    /// Do not write the track listing file
    #[arg(long)]
    pub no_save: bool,

    /// Output events as JSON lines
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape a chart and create a playlist from it
    ///
    /// Requires SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET and
    /// SPOTIFY_REFRESH_TOKEN in the environment or a .env file.
    ///
    /// Usage examples:
    /// # Billboard Hot 100 for a past week
    /// chart-playlist build --chart billboard --date 2001-09-15 --name "Fall 2001"
    ///
    /// # SoundCloud techno chart, no prompts
    /// chart-playlist build --chart soundcloud-edm --genre techno --yes
    ///
    /// # Resolve 50 tracks with 4 searches in flight
    /// chart-playlist build --chart traxsource-deep-house --limit 50 --concurrency 4
    Build {
        #[command(flatten)]
        chart: ChartOptions,

        /// Playlist name (prompted for when omitted; blank uses the chart default)
        #[arg(long)]
        name: Option<String>,

        /// Playlist description (defaults to the chart's description)
        #[arg(long)]
        description: Option<String>,

        /// Maximum number of chart entries to search for
        #[arg(long, default_value = "30")]
        limit: usize,

        /// Number of searches in flight at once
        #[arg(long, default_value = "1")]
        concurrency: usize,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Scrape a chart and print its entries
    ///
    /// Needs no streaming service credentials.
    ///
    /// Usage examples:
    /// chart-playlist scrape --chart apple-music-edm
    /// chart-playlist scrape --chart billboard --date 1985-07-13 --json
    Scrape {
        #[command(flatten)]
        chart: ChartOptions,

        /// Directory for the track listing file
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Save every fetched page to this directory
        #[arg(long)]
        debug_dir: Option<PathBuf>,
    },
}

pub async fn execute_command(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Build {
            chart,
            name,
            description,
            limit,
            concurrency,
            yes,
        } => {
            build::handle_build(build::BuildRequest {
                chart,
                name,
                description,
                limit,
                concurrency,
                yes,
            })
            .await
        }
        Commands::Scrape {
            chart,
            output_dir,
            debug_dir,
        } => scrape::handle_scrape(chart, output_dir, debug_dir).await,
    }
}
