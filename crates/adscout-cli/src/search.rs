//! `search`, `batch`, and the default demo run.

use std::path::Path;
use std::time::Instant;

use adscout_core::{AppConfig, ProductRecord, CURRENCY};
use adscout_scraper::{
    export::export_all, search_many, AdsClient, ResultsSummary, SearchOutcome, StrategyChain,
};
use anyhow::Context;
use chrono::Local;

const SAMPLE_SIZE: usize = 3;
const SAMPLE_NAME_CHARS: usize = 55;

fn build_client(config: &AppConfig) -> anyhow::Result<AdsClient> {
    AdsClient::new(&config.api_base_url, config.request_timeout_secs)
        .context("failed to build sponsored-products client")
}

/// Runs the strategy chain for one keyword, prints a report, and exports
/// the results when `save` is set.
///
/// # Errors
///
/// Returns an error if the client cannot be built or an export file cannot
/// be written. An empty result is reported, not an error.
pub(crate) async fn run_search(
    config: &AppConfig,
    output_dir: &Path,
    keyword: &str,
    pages: u32,
    save: bool,
) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let chain = StrategyChain::from_config(&client, config);

    let started = Instant::now();
    let outcome = chain.search(keyword, pages).await;
    let elapsed = started.elapsed();

    if outcome.records.is_empty() {
        println!("No products found for '{keyword}' after {} strategies.", outcome.attempts.len());
        println!("Try again later or check the network connection.");
        return Ok(());
    }

    print_strategy(&outcome);
    print_sample(&outcome.records);
    if let Some(summary) = ResultsSummary::from_records(&outcome.records) {
        println!("{summary}");
    }
    println!("Completed in {:.1} seconds", elapsed.as_secs_f64());

    if save {
        let paths = export_all(&outcome.records, keyword, output_dir, Local::now())
            .with_context(|| format!("failed to export results for '{keyword}'"))?;
        for path in paths {
            println!("saved {}", path.display());
        }
    }
    Ok(())
}

/// Runs every keyword in order, exports each non-empty result, and prints a
/// per-keyword count table.
///
/// # Errors
///
/// Returns an error if the client cannot be built or an export fails.
pub(crate) async fn run_batch(
    config: &AppConfig,
    output_dir: &Path,
    keywords: &[String],
    pages: u32,
    save: bool,
) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let chain = StrategyChain::from_config(&client, config);

    let outcomes = search_many(&chain, keywords, pages).await;

    for outcome in &outcomes {
        if save && !outcome.records.is_empty() {
            export_all(&outcome.records, &outcome.keyword, output_dir, Local::now())
                .with_context(|| format!("failed to export results for '{}'", outcome.keyword))?;
            println!("{}: {} products saved", outcome.keyword, outcome.records.len());
        }
    }

    println!();
    println!("Results summary");
    println!("{}", "=".repeat(40));
    let mut total = 0;
    for outcome in &outcomes {
        total += outcome.records.len();
        println!("  {:12}: {:4} products", outcome.keyword, outcome.records.len());
    }
    println!("  {:12}: {total:4} products", "TOTAL");
    Ok(())
}

fn print_strategy(outcome: &SearchOutcome) {
    let Some(strategy) = outcome.strategy else {
        return;
    };
    println!(
        "Scraped {} products for '{}' with the {strategy} strategy ({} attempt(s))",
        outcome.records.len(),
        outcome.keyword,
        outcome.attempts.len()
    );
}

fn print_sample(records: &[ProductRecord]) {
    println!();
    println!("Sample products:");
    println!("{}", "-".repeat(50));
    for (i, record) in records.iter().take(SAMPLE_SIZE).enumerate() {
        let name: String = record.name().chars().take(SAMPLE_NAME_CHARS).collect();
        println!("{}. {name}", i + 1);
        println!(
            "   {:.2} {CURRENCY} (was {:.2} {CURRENCY})",
            record.price(),
            record.original_price()
        );
        if record.is_discounted() {
            println!(
                "   {}% off, save {:.2} {CURRENCY}",
                record.discount_rate(),
                record.savings()
            );
        }
        println!("   {} | {}", record.merchant_name(), record.brand());
        println!();
    }
}
