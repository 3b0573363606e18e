//! File export of a keyword's results: CSV, JSON, and a plain-text summary.
//!
//! All three files share the base name `ecommerce_<keyword>_<YYYYmmdd_HHMMSS>`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use adscout_core::{ProductRecord, CURRENCY};
use chrono::{DateTime, Local, SecondsFormat};
use serde::Serialize;

use crate::analysis::ResultsSummary;
use crate::error::ScraperError;

/// UTF-8 byte-order mark so spreadsheet tools detect the encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Separator used to flatten `tags` into one CSV cell.
const TAG_SEPARATOR: &str = ";";

/// Flat view of a [`ProductRecord`] for CSV rows.
#[derive(Serialize)]
struct CsvRow<'a> {
    product_id: &'a str,
    name: &'a str,
    brand: &'a str,
    price: f64,
    original_price: f64,
    discount_rate: f64,
    currency: &'a str,
    image_url: &'a str,
    product_url: &'a str,
    merchant_name: &'a str,
    category: &'a str,
    sku: &'a str,
    main_category_id: &'a str,
    listing_id: &'a str,
    tags: String,
    savings: f64,
    scraped_page: u32,
    scraped_at: String,
}

impl<'a> From<&'a ProductRecord> for CsvRow<'a> {
    fn from(r: &'a ProductRecord) -> Self {
        Self {
            product_id: r.product_id(),
            name: r.name(),
            brand: r.brand(),
            price: r.price(),
            original_price: r.original_price(),
            discount_rate: r.discount_rate(),
            currency: r.currency(),
            image_url: r.image_url(),
            product_url: r.product_url(),
            merchant_name: r.merchant_name(),
            category: r.category(),
            sku: r.sku(),
            main_category_id: r.main_category_id(),
            listing_id: r.listing_id(),
            tags: r.tags().join(TAG_SEPARATOR),
            savings: r.savings(),
            scraped_page: r.scraped_page(),
            scraped_at: r.scraped_at().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// `ecommerce_<keyword>_<YYYYmmdd_HHMMSS>`, with every character of the
/// keyword other than letters, digits, `-` and `_` replaced by `_`.
#[must_use]
pub fn base_filename(keyword: &str, now: DateTime<Local>) -> String {
    format!(
        "ecommerce_{}_{}",
        file_safe(keyword),
        now.format("%Y%m%d_%H%M%S")
    )
}

fn file_safe(keyword: &str) -> String {
    keyword
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Writes the CSV, JSON, and summary files for `records` into `dir` and
/// returns their paths in that order. Writes nothing for an empty slice.
///
/// # Errors
///
/// Returns [`ScraperError::Export`] on I/O failure, [`ScraperError::Csv`] if
/// a row cannot be encoded, or [`ScraperError::Serialize`] if JSON encoding fails.
pub fn export_all(
    records: &[ProductRecord],
    keyword: &str,
    dir: &Path,
    now: DateTime<Local>,
) -> Result<Vec<PathBuf>, ScraperError> {
    if records.is_empty() {
        tracing::debug!(keyword, "nothing to export");
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
    let base = base_filename(keyword, now);

    let csv_path = dir.join(format!("{base}.csv"));
    write_csv(records, &csv_path)?;
    tracing::info!(path = %csv_path.display(), products = records.len(), "saved CSV");

    let json_path = dir.join(format!("{base}.json"));
    write_json(records, &json_path)?;
    tracing::info!(path = %json_path.display(), products = records.len(), "saved JSON");

    let summary_path = dir.join(format!("{base}_summary.txt"));
    write_summary(records, keyword, now, &summary_path)?;
    tracing::info!(path = %summary_path.display(), "saved summary");

    Ok(vec![csv_path, json_path, summary_path])
}

/// Writes `records` as a BOM-prefixed CSV file with a header row.
///
/// # Errors
///
/// Returns [`ScraperError::Export`] or [`ScraperError::Csv`].
pub fn write_csv(records: &[ProductRecord], path: &Path) -> Result<(), ScraperError> {
    let mut file = File::create(path).map_err(|e| io_error(path, e))?;
    file.write_all(UTF8_BOM).map_err(|e| io_error(path, e))?;

    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    writer.flush().map_err(|e| io_error(path, e))?;
    Ok(())
}

/// Writes `records` as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`ScraperError::Export`] or [`ScraperError::Serialize`].
pub fn write_json(records: &[ProductRecord], path: &Path) -> Result<(), ScraperError> {
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records).map_err(|e| {
        ScraperError::Serialize {
            context: format!("JSON export to {}", path.display()),
            source: e,
        }
    })?;
    writer.flush().map_err(|e| io_error(path, e))
}

/// Reads a JSON export back into records.
///
/// # Errors
///
/// Returns [`ScraperError::Export`] if the file cannot be read or
/// [`ScraperError::Deserialize`] if it is not a record array.
pub fn read_json(path: &Path) -> Result<Vec<ProductRecord>, ScraperError> {
    let content = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    serde_json::from_str(&content).map_err(|e| ScraperError::Deserialize {
        context: format!("JSON export {}", path.display()),
        source: e,
    })
}

/// Renders the plain-text summary written next to the data files.
#[must_use]
pub fn render_summary(records: &[ProductRecord], keyword: &str, now: DateTime<Local>) -> String {
    let mut out = String::new();
    out.push_str("E-commerce Scraping Summary\n");
    out.push_str("===========================\n");
    out.push_str(&format!("Keyword: {keyword}\n"));
    out.push_str(&format!("Products: {}\n", records.len()));
    out.push_str(&format!("Scraped: {}\n", now.format("%Y-%m-%d %H:%M:%S")));
    if let Some(summary) = ResultsSummary::from_records(records) {
        out.push_str(&format!("Brands: {}\n", summary.unique_brands));
        out.push_str(&format!(
            "Price Range: {:.0} - {:.0} {CURRENCY}\n",
            summary.min_price, summary.max_price
        ));
    }
    out
}

fn write_summary(
    records: &[ProductRecord],
    keyword: &str,
    now: DateTime<Local>,
    path: &Path,
) -> Result<(), ScraperError> {
    std::fs::write(path, render_summary(records, keyword, now)).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, source: std::io::Error) -> ScraperError {
    ScraperError::Export {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
