//! Sponsored-products scraper: header-profile fallback chain, pagination
//! driver, lenient JSON extraction, plus analysis and export of the results.

pub mod analysis;
pub mod client;
pub mod error;
pub mod export;
pub mod extract;
pub mod pacing;
pub mod pagination;
pub mod strategy;

mod extract_helpers;

pub use analysis::ResultsSummary;
pub use client::{AdsClient, RawResponse, Session};
pub use error::ScraperError;
pub use extract::{extract_page, extract_products};
pub use pacing::Pacer;
pub use pagination::{PageOutcome, PaginationDriver, RunReport, StopReason};
pub use strategy::{search_many, SearchOutcome, Strategy, StrategyAttempt, StrategyChain};
