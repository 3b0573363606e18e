//! Hacker News front-page scraper.
//!
//! Stories live in `tr.athing` rows; score, author, and comment count sit in
//! the `tr` immediately after. Everything except the title is optional and
//! falls back to a default rather than dropping the story.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use adscout_core::HeaderProfile;
use chrono::{DateTime, Local, Utc};
use regex::Regex;
use reqwest::header::USER_AGENT;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::WebError;

static STORY_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr.athing").expect("valid selector"));
static TITLE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.title a").expect("valid selector"));
static SCORE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".score").expect("valid selector"));
static AUTHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".hnuser").expect("valid selector"));
static ITEM_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="item"]"#).expect("valid selector"));
static FIRST_INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// 1-based position among the story rows on the page.
    pub rank: usize,
    pub title: String,
    /// As linked; relative for self posts (`item?id=...`).
    pub url: String,
    pub score: u32,
    pub author: String,
    pub comments: u32,
    pub scraped_at: DateTime<Utc>,
}

/// Parsed front page.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontPage {
    pub stories: Vec<Story>,
    /// Story rows skipped for lack of a title link or title text.
    pub failed: usize,
}

/// Fetches `url` with the simple browser user-agent and parses it.
///
/// # Errors
///
/// Returns [`WebError::Http`] on transport failure or [`WebError::Status`]
/// for a non-2xx response.
pub async fn fetch_front_page(client: &reqwest::Client, url: &str) -> Result<FrontPage, WebError> {
    let profile = HeaderProfile::simple();
    let user_agent = profile.get("user-agent").unwrap_or_default();

    tracing::info!(url, "fetching Hacker News front page");
    let response = client.get(url).header(USER_AGENT, user_agent).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(WebError::Status {
            url: url.to_owned(),
            status: status.as_u16(),
        });
    }
    let html = response.text().await?;
    tracing::debug!(url, bytes = html.len(), "front page downloaded");

    let page = parse_front_page(&html, Utc::now());
    tracing::info!(
        stories = page.stories.len(),
        failed = page.failed,
        "parsed front page"
    );
    Ok(page)
}

/// Extracts stories from front-page HTML. Never fails; malformed rows are
/// counted in [`FrontPage::failed`].
#[must_use]
pub fn parse_front_page(html: &str, scraped_at: DateTime<Utc>) -> FrontPage {
    let document = Html::parse_document(html);
    let mut stories = Vec::new();
    let mut failed = 0;

    for (index, row) in document.select(&STORY_ROW).enumerate() {
        let rank = index + 1;
        let Some(link) = row.select(&TITLE_LINK).next() else {
            tracing::debug!(rank, "story row without a title link");
            failed += 1;
            continue;
        };
        let title = stripped_text(link);
        if title.is_empty() {
            tracing::debug!(rank, "story row with an empty title");
            failed += 1;
            continue;
        }
        let url = link.value().attr("href").unwrap_or_default().to_owned();

        let mut story = Story {
            rank,
            title,
            url,
            score: 0,
            author: UNKNOWN_AUTHOR.to_owned(),
            comments: 0,
            scraped_at,
        };
        if let Some(meta) = metadata_row(row) {
            fill_metadata(&mut story, meta);
        }
        stories.push(story);
    }

    FrontPage { stories, failed }
}

/// Writes `stories` to `hacker_news_stories_<YYYYmmdd_HHMMSS>.json` in `dir`.
///
/// # Errors
///
/// Returns [`WebError::Io`] if the file cannot be written or
/// [`WebError::Json`] if encoding fails.
pub fn save_stories(
    stories: &[Story],
    dir: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf, WebError> {
    std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
    let path = dir.join(format!(
        "hacker_news_stories_{}.json",
        now.format("%Y%m%d_%H%M%S")
    ));
    let json = serde_json::to_string_pretty(stories)?;
    std::fs::write(&path, json).map_err(|e| io_error(&path, e))?;
    tracing::info!(path = %path.display(), stories = stories.len(), "saved stories");
    Ok(path)
}

fn io_error(path: &Path, source: std::io::Error) -> WebError {
    WebError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// First `tr` sibling after the story row.
fn metadata_row(row: ElementRef<'_>) -> Option<ElementRef<'_>> {
    row.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "tr")
}

fn fill_metadata(story: &mut Story, meta: ElementRef<'_>) {
    if let Some(score) = meta
        .select(&SCORE)
        .next()
        .and_then(|el| first_int(&el.text().collect::<String>()))
    {
        story.score = score;
    }

    if let Some(author) = meta.select(&AUTHOR).next() {
        story.author = stripped_text(author);
    }

    // "discuss" links also point at the item page; only "N comments" counts.
    for link in meta.select(&ITEM_LINK) {
        let text: String = link.text().collect();
        if !text.to_lowercase().contains("comment") {
            continue;
        }
        if let Some(count) = first_int(&text) {
            story.comments = count;
            break;
        }
    }
}

fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}

fn first_int(text: &str) -> Option<u32> {
    FIRST_INT
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
#[path = "hn_test.rs"]
mod tests;
