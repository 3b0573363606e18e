//! `hn` and `summarize`.

use std::path::Path;
use std::time::Duration;

use adscout_core::{AppConfig, ConfigError};
use adscout_web::{fetch_front_page, save_stories, summarize_page, GeminiClient, PageFetcher};
use anyhow::Context;
use chrono::Local;

const PREVIEW_STORIES: usize = 3;
const PREVIEW_CHARS: usize = 1_000;

pub(crate) async fn run_hn(config: &AppConfig, output_dir: &Path, save: bool) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .context("failed to build HTTP client")?;
    let page = fetch_front_page(&client, &config.hn_url)
        .await
        .with_context(|| format!("failed to fetch {}", config.hn_url))?;

    println!("Extracted {} stories", page.stories.len());
    if page.failed > 0 {
        println!("Failed extractions: {}", page.failed);
    }
    if page.stories.is_empty() {
        println!("No stories extracted; the page layout may have changed.");
        return Ok(());
    }

    for story in page.stories.iter().take(PREVIEW_STORIES) {
        println!();
        println!("{}. {}", story.rank, story.title);
        println!("   {}", story.url);
        println!(
            "   {} points | {} | {} comments",
            story.score, story.author, story.comments
        );
    }

    if save {
        let path = save_stories(&page.stories, output_dir, Local::now())?;
        println!();
        println!("saved {} stories to {}", page.stories.len(), path.display());
    }
    Ok(())
}

pub(crate) async fn run_summarize(
    config: &AppConfig,
    url: &str,
    question: &str,
) -> anyhow::Result<()> {
    let api_key = config
        .google_api_key
        .clone()
        .ok_or_else(|| ConfigError::MissingEnvVar("GOOGLE_API_KEY".to_string()))?;
    let fetcher = PageFetcher::new(config.page_timeout_secs)?;
    let llm = GeminiClient::new(&config.llm_base_url, &config.llm_model, api_key)?;

    let summary = summarize_page(&fetcher, &llm, url, question).await?;

    println!("Analysis for {}", summary.url);
    println!("{}", "=".repeat(40));
    println!("{}", summary.analysis);
    println!();
    println!("Content length:  {} chars", summary.content_length);
    println!("Processing time: {:.2}s", summary.elapsed.as_secs_f64());
    println!();
    let preview: String = summary.content.chars().take(PREVIEW_CHARS).collect();
    if summary.content_length > PREVIEW_CHARS {
        println!("{preview}...");
    } else {
        println!("{preview}");
    }
    Ok(())
}
