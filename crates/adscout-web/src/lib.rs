//! General-purpose page scrapers that sit next to the sponsored-products
//! pipeline: the Hacker News front page and an LLM-backed page summarizer.

pub mod error;
pub mod hn;
pub mod summarize;

pub use error::WebError;
pub use hn::{fetch_front_page, parse_front_page, save_stories, FrontPage, Story};
pub use summarize::{
    build_analysis_prompt, normalize_url, summarize_page, GeminiClient, PageFetcher, PageSummary,
};
