mod caption;
mod config;
mod dataset;
mod error;
mod extractor;
mod normaliser;
mod parser;
mod pipeline;
mod seed;
mod serialiser;
mod source;
mod youtube;

use crate::config::{Profile, Settings};
use crate::youtube::YouTubeClient;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("caption_corpus=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(ClapParser)]
#[command(about = "Build a question/answer fine-tuning dataset from a YouTube channel's captions")]
struct Cli {
    #[arg(
        long,
        env = config::API_KEY_ENV,
        hide_env_values = true,
        help = "YouTube Data API v3 key used to list the channel's videos."
    )]
    api_key: Option<String>,
    #[arg(
        short,
        long,
        value_name = "URL",
        help = "Channel URL, @handle or channel id.",
        default_value = "https://youtube.com/@kodla_dev"
    )]
    channel: String,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The JSONL dataset to write. An existing file is overwritten.",
        default_value = "kodla_dev_dataset.jsonl"
    )]
    output: PathBuf,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Also write the cleaned transcripts of every video to the specified file."
    )]
    transcripts: Option<PathBuf>,
    #[arg(
        long,
        value_name = "DURATION",
        help = "Pause after each video to stay under the caption service's rate limits.",
        default_value = "500ms",
        value_parser = humantime::parse_duration
    )]
    pace: Duration,
    #[arg(
        long,
        value_name = "LANG",
        help = "Preferred caption language.",
        default_value = "tr"
    )]
    primary_language: String,
    #[arg(
        long,
        value_name = "LANG",
        help = "Caption language used when the preferred one is unavailable.",
        default_value = "en"
    )]
    secondary_language: String,
    #[arg(
        long,
        value_enum,
        help = "Keyword and question templates used for extraction.",
        default_value_t = Profile::Turkish
    )]
    profile: Profile,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let api_key = match config::credential(cli.api_key.as_deref()) {
        Some(key) => key,
        None => {
            eprintln!("{}", config::MISSING_KEY_HELP);
            return Ok(());
        }
    };

    let chain = source::fallback_chain(&cli.primary_language, &cli.secondary_language);
    let client = YouTubeClient::new(api_key, chain).context("Failed to set up HTTP client")?;
    let settings = Settings {
        channel: cli.channel,
        output: cli.output,
        transcripts: cli.transcripts,
        pace: cli.pace,
        vocabulary: cli.profile.vocabulary(),
    };

    let summary = pipeline::run(&client, &client, &settings)
        .with_context(|| format!("Failed to build a dataset for '{}'", settings.channel))?;

    info!("Videos: {}", summary.videos);
    info!("Transcripts: {}", summary.transcripts);
    info!(
        "Pairs: {} ({} seed, {} extracted)",
        summary.seed_pairs + summary.extracted_pairs,
        summary.seed_pairs,
        summary.extracted_pairs
    );
    info!("Dataset: {}", summary.output.display());
    Ok(())
}
