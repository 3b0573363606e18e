mod search;
mod web;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

const DEMO_KEYWORD: &str = "laptop";
const DEMO_PAGES: u32 = 6;

#[derive(Debug, Parser)]
#[command(name = "adscout")]
#[command(about = "Sponsored-product scraper and page analysis tools")]
struct Cli {
    /// Directory for exported files; overrides `ADSCOUT_OUTPUT_DIR`.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape sponsored products for one keyword
    Search {
        keyword: String,
        /// Maximum pages per strategy
        #[arg(long, default_value_t = 10)]
        pages: u32,
        /// Print results without writing CSV/JSON/summary files
        #[arg(long)]
        no_save: bool,
    },
    /// Scrape several keywords in order
    Batch {
        #[arg(default_values = ["laptop", "phone", "tablet", "headphone", "mouse"])]
        keywords: Vec<String>,
        #[arg(long, default_value_t = 4)]
        pages: u32,
        #[arg(long)]
        no_save: bool,
    },
    /// Scrape the Hacker News front page
    Hn {
        #[arg(long)]
        no_save: bool,
    },
    /// Fetch a page and ask the LLM a question about it
    Summarize { url: String, question: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = adscout_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());
    tracing::debug!(env = %config.env, output_dir = %output_dir.display(), "configuration loaded");

    match cli.command {
        Some(Commands::Search {
            keyword,
            pages,
            no_save,
        }) => search::run_search(&config, &output_dir, &keyword, pages, !no_save).await,
        Some(Commands::Batch {
            keywords,
            pages,
            no_save,
        }) => search::run_batch(&config, &output_dir, &keywords, pages, !no_save).await,
        Some(Commands::Hn { no_save }) => web::run_hn(&config, &output_dir, !no_save).await,
        Some(Commands::Summarize { url, question }) => {
            web::run_summarize(&config, &url, &question).await
        }
        None => search::run_search(&config, &output_dir, DEMO_KEYWORD, DEMO_PAGES, true).await,
    }
}
