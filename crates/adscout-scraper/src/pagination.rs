//! Pagination driver: walks `page=1..=N` for one header profile.
//!
//! Each response is classified into a [`PageOutcome`] and folded into the
//! transient run state:
//!
//! | outcome | effect |
//! |---------|--------|
//! | `Records` | append, reset consecutive failures |
//! | `EndOfListing` | stop, not a failure |
//! | `Blocked` (403) | stop immediately, keep what was collected |
//! | `Failed` | consecutive failures += 1; stop at the threshold |
//!
//! Pages are requested strictly one after another with a [`Pacer`] pause
//! between consecutive requests.

use adscout_core::{HeaderProfile, ProductRecord};

use crate::client::{AdsClient, RawResponse, Session};
use crate::error::ScraperError;
use crate::extract::extract_page;
use crate::pacing::Pacer;

const STATUS_OK: u16 = 200;
const STATUS_FORBIDDEN: u16 = 403;

/// What a single page request produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// At least one product was extracted.
    Records(Vec<ProductRecord>),
    /// HTTP 200 with zero products: the listing has no more pages.
    EndOfListing,
    /// HTTP 403: the target rejected this header profile.
    Blocked,
    /// Any other status, a transport error, or an undecodable body.
    Failed(String),
}

impl PageOutcome {
    /// Classifies the adapter's result for `page`.
    #[must_use]
    pub fn classify(response: Result<RawResponse, ScraperError>, page: u32) -> Self {
        let raw = match response {
            Ok(raw) => raw,
            Err(e) => return Self::Failed(e.to_string()),
        };
        match raw.status {
            STATUS_OK => match extract_page(&raw.body, page) {
                Ok(records) if records.is_empty() => Self::EndOfListing,
                Ok(records) => Self::Records(records),
                Err(e) => Self::Failed(e.to_string()),
            },
            STATUS_FORBIDDEN => Self::Blocked,
            status => Self::Failed(format!("unexpected HTTP status {status}")),
        }
    }
}

/// Why a pagination run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every requested page was attempted.
    PageBudgetExhausted,
    /// `page` came back empty.
    EndOfListing { page: u32 },
    /// `page` returned 403.
    Blocked { page: u32 },
    /// `page` was the last of too many consecutive failures.
    TooManyFailures { page: u32 },
}

/// Result of one pagination run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Records in ascending page order.
    pub records: Vec<ProductRecord>,
    /// Number of HTTP requests issued.
    pub pages_requested: u32,
    /// Number of requests that ended in `Blocked` or `Failed`.
    pub failed_pages: u32,
    pub stop: StopReason,
}

/// Mutable state for the duration of one run; consumed into a [`RunReport`].
#[derive(Default)]
struct StrategyRun {
    records: Vec<ProductRecord>,
    consecutive_failures: u32,
    pages_requested: u32,
    failed_pages: u32,
}

impl StrategyRun {
    fn finish(self, stop: StopReason) -> RunReport {
        RunReport {
            records: self.records,
            pages_requested: self.pages_requested,
            failed_pages: self.failed_pages,
            stop,
        }
    }
}

/// Drives page-by-page requests for a single strategy.
pub struct PaginationDriver<'a> {
    client: &'a AdsClient,
    pacer: Pacer,
    max_consecutive_failures: u32,
}

impl<'a> PaginationDriver<'a> {
    /// `max_consecutive_failures` is clamped to at least 1.
    #[must_use]
    pub fn new(client: &'a AdsClient, pacer: Pacer, max_consecutive_failures: u32) -> Self {
        Self {
            client,
            pacer,
            max_consecutive_failures: max_consecutive_failures.max(1),
        }
    }

    /// Requests pages `1..=pages` of `keyword` with `profile`, stopping early
    /// on an empty page, a 403, or too many consecutive failures.
    pub async fn run(&self, profile: &HeaderProfile, keyword: &str, pages: u32) -> RunReport {
        let mut run = StrategyRun::default();

        for page in 1..=pages {
            if page > 1 {
                self.pacer.pause().await;
            }
            tracing::info!(profile = profile.name(), keyword, page, pages, "fetching page");

            let response = self.client.fetch_page(profile, keyword, page).await;
            run.pages_requested += 1;

            match PageOutcome::classify(response, page) {
                PageOutcome::Records(records) => {
                    tracing::info!(page, products = records.len(), "extracted products");
                    run.records.extend(records);
                    run.consecutive_failures = 0;
                }
                PageOutcome::EndOfListing => {
                    tracing::info!(page, "no products on page; treating as end of listing");
                    return run.finish(StopReason::EndOfListing { page });
                }
                PageOutcome::Blocked => {
                    run.failed_pages += 1;
                    tracing::warn!(profile = profile.name(), page, "403 Forbidden; profile blocked");
                    return run.finish(StopReason::Blocked { page });
                }
                PageOutcome::Failed(reason) => {
                    run.failed_pages += 1;
                    run.consecutive_failures += 1;
                    tracing::warn!(
                        profile = profile.name(),
                        page,
                        consecutive_failures = run.consecutive_failures,
                        reason = %reason,
                        "page request failed"
                    );
                    if run.consecutive_failures >= self.max_consecutive_failures {
                        tracing::error!(
                            profile = profile.name(),
                            page,
                            "too many consecutive failures; abandoning profile"
                        );
                        return run.finish(StopReason::TooManyFailures { page });
                    }
                }
            }
        }

        run.finish(StopReason::PageBudgetExhausted)
    }

    /// Requests pages `1..=pages`, rotating round-robin through `sessions`
    /// (page `p` uses session `(p - 1) % sessions.len()`).
    ///
    /// Never stops early: failed and empty pages are skipped and whatever
    /// succeeds is kept. Returns an empty report when `sessions` is empty.
    pub async fn run_rotating(&self, sessions: &[Session], keyword: &str, pages: u32) -> RunReport {
        let mut run = StrategyRun::default();
        if sessions.is_empty() {
            return run.finish(StopReason::PageBudgetExhausted);
        }

        for (page, session) in (1..=pages).zip(sessions.iter().cycle()) {
            if page > 1 {
                self.pacer.pause().await;
            }
            let response = self.client.fetch_page_in(session, keyword, page).await;
            run.pages_requested += 1;

            match PageOutcome::classify(response, page) {
                PageOutcome::Records(records) => {
                    tracing::info!(
                        session = session.profile().name(),
                        page,
                        products = records.len(),
                        "extracted products"
                    );
                    run.records.extend(records);
                }
                PageOutcome::EndOfListing => {
                    tracing::debug!(session = session.profile().name(), page, "empty page");
                }
                PageOutcome::Blocked => {
                    run.failed_pages += 1;
                    tracing::debug!(session = session.profile().name(), page, "page blocked; ignored");
                }
                PageOutcome::Failed(reason) => {
                    run.failed_pages += 1;
                    tracing::debug!(
                        session = session.profile().name(),
                        page,
                        reason = %reason,
                        "page failed; ignored"
                    );
                }
            }
        }

        run.finish(StopReason::PageBudgetExhausted)
    }
}
