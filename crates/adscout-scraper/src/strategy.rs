//! Strategy selection: a fixed fallback chain of header profiles.
//!
//! ```text
//! TrySimple ──records──▶ Done
//!     │ empty
//!     ▼
//! TryAdvanced ──records──▶ Done
//!     │ empty
//!     ▼
//! TryDynamic ──always──▶ Done
//! ```
//!
//! Escalation happens only when a strategy produced zero records. A partial
//! result (e.g. two good pages, then a 403) is final.

use adscout_core::{AppConfig, HeaderProfile, ProductRecord};

use crate::client::AdsClient;
use crate::pacing::Pacer;
use crate::pagination::{PaginationDriver, RunReport, StopReason};

const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 3;
const DEFAULT_DYNAMIC_SESSIONS: usize = 3;

/// One rung of the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Bare user-agent profile.
    Simple,
    /// Full browser-replay profile with a per-keyword referer.
    Advanced,
    /// Round-robin over several independent sessions, ignoring failures.
    Dynamic,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Simple => write!(f, "simple"),
            Strategy::Advanced => write!(f, "advanced"),
            Strategy::Dynamic => write!(f, "dynamic"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChainState {
    Try(Strategy),
    Done,
}

/// Next state after `strategy` finished with or without records.
fn transition(strategy: Strategy, found_records: bool) -> ChainState {
    if found_records {
        return ChainState::Done;
    }
    match strategy {
        Strategy::Simple => ChainState::Try(Strategy::Advanced),
        Strategy::Advanced => ChainState::Try(Strategy::Dynamic),
        Strategy::Dynamic => ChainState::Done,
    }
}

/// Bookkeeping for one strategy attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyAttempt {
    pub strategy: Strategy,
    pub records_found: usize,
    pub pages_requested: u32,
    pub failed_pages: u32,
    /// `None` when the attempt could not start (see `error`).
    pub stop: Option<StopReason>,
    pub error: Option<String>,
}

impl StrategyAttempt {
    fn from_report(strategy: Strategy, report: &RunReport) -> Self {
        Self {
            strategy,
            records_found: report.records.len(),
            pages_requested: report.pages_requested,
            failed_pages: report.failed_pages,
            stop: Some(report.stop),
            error: None,
        }
    }
}

/// Result of a full chain run for one keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub keyword: String,
    pub records: Vec<ProductRecord>,
    /// Strategy that produced `records`; `None` when every strategy came back empty.
    pub strategy: Option<Strategy>,
    /// Every attempt in the order it ran.
    pub attempts: Vec<StrategyAttempt>,
}

/// Runs the simple → advanced → dynamic fallback chain against one client.
pub struct StrategyChain<'a> {
    client: &'a AdsClient,
    pacer: Pacer,
    dynamic_pacer: Pacer,
    max_consecutive_failures: u32,
    dynamic_sessions: usize,
    simple: HeaderProfile,
    advanced: HeaderProfile,
}

impl<'a> StrategyChain<'a> {
    /// Chain with the stock profiles, 1.5–3.5 s pacing (2–4 s for the
    /// dynamic strategy), a failure threshold of 3, and 3 dynamic sessions.
    #[must_use]
    pub fn new(client: &'a AdsClient) -> Self {
        Self {
            client,
            pacer: Pacer::new(1_500, 3_500),
            dynamic_pacer: Pacer::new(2_000, 4_000),
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
            dynamic_sessions: DEFAULT_DYNAMIC_SESSIONS,
            simple: HeaderProfile::simple(),
            advanced: HeaderProfile::advanced(),
        }
    }

    /// Chain tuned from the application config.
    #[must_use]
    pub fn from_config(client: &'a AdsClient, config: &AppConfig) -> Self {
        Self::new(client)
            .with_pacing(
                Pacer::new(config.pacing_min_ms, config.pacing_max_ms),
                Pacer::new(config.dynamic_pacing_min_ms, config.dynamic_pacing_max_ms),
            )
            .with_max_consecutive_failures(config.max_consecutive_failures)
            .with_dynamic_sessions(config.dynamic_sessions)
    }

    #[must_use]
    pub fn with_pacing(mut self, pacer: Pacer, dynamic_pacer: Pacer) -> Self {
        self.pacer = pacer;
        self.dynamic_pacer = dynamic_pacer;
        self
    }

    #[must_use]
    pub fn with_max_consecutive_failures(mut self, threshold: u32) -> Self {
        self.max_consecutive_failures = threshold;
        self
    }

    #[must_use]
    pub fn with_dynamic_sessions(mut self, sessions: usize) -> Self {
        self.dynamic_sessions = sessions;
        self
    }

    /// Replaces the simple and advanced profiles. Dynamic sessions are
    /// derived from `simple`.
    #[must_use]
    pub fn with_profiles(mut self, simple: HeaderProfile, advanced: HeaderProfile) -> Self {
        self.simple = simple;
        self.advanced = advanced;
        self
    }

    /// Runs the chain for `keyword` over at most `pages` pages per strategy.
    pub async fn search(&self, keyword: &str, pages: u32) -> SearchOutcome {
        tracing::info!(keyword, pages, "starting search");

        let mut state = ChainState::Try(Strategy::Simple);
        let mut attempts = Vec::new();
        let mut records = Vec::new();
        let mut winner = None;

        while let ChainState::Try(strategy) = state {
            tracing::info!(keyword, %strategy, "trying strategy");
            let (attempt, found) = self.attempt(strategy, keyword, pages).await;
            attempts.push(attempt);

            let found_records = !found.is_empty();
            if found_records {
                tracing::info!(keyword, %strategy, products = found.len(), "strategy succeeded");
                records = found;
                winner = Some(strategy);
            }
            state = transition(strategy, found_records);
        }

        if winner.is_none() {
            tracing::warn!(keyword, "every strategy came back empty");
        }

        SearchOutcome {
            keyword: keyword.to_owned(),
            records,
            strategy: winner,
            attempts,
        }
    }

    async fn attempt(
        &self,
        strategy: Strategy,
        keyword: &str,
        pages: u32,
    ) -> (StrategyAttempt, Vec<ProductRecord>) {
        match strategy {
            Strategy::Simple | Strategy::Advanced => {
                let base = if strategy == Strategy::Simple {
                    &self.simple
                } else {
                    &self.advanced
                };
                let profile = base.for_keyword(keyword);
                let driver =
                    PaginationDriver::new(self.client, self.pacer, self.max_consecutive_failures);
                let report = driver.run(&profile, keyword, pages).await;
                (StrategyAttempt::from_report(strategy, &report), report.records)
            }
            Strategy::Dynamic => self.attempt_dynamic(keyword, pages).await,
        }
    }

    async fn attempt_dynamic(
        &self,
        keyword: &str,
        pages: u32,
    ) -> (StrategyAttempt, Vec<ProductRecord>) {
        let sessions = match self.client.open_sessions(&self.simple, self.dynamic_sessions) {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::error!(keyword, error = %e, "could not open dynamic sessions");
                let attempt = StrategyAttempt {
                    strategy: Strategy::Dynamic,
                    records_found: 0,
                    pages_requested: 0,
                    failed_pages: 0,
                    stop: None,
                    error: Some(e.to_string()),
                };
                return (attempt, Vec::new());
            }
        };

        let driver = PaginationDriver::new(
            self.client,
            self.dynamic_pacer,
            self.max_consecutive_failures,
        );
        let report = driver.run_rotating(&sessions, keyword, pages).await;
        if report.failed_pages > 0 {
            // No failure signal leaves this strategy; the count is the only trace.
            tracing::warn!(
                keyword,
                failed_pages = report.failed_pages,
                pages_requested = report.pages_requested,
                "dynamic strategy ignored failed pages; result may be partial"
            );
        }
        (
            StrategyAttempt::from_report(Strategy::Dynamic, &report),
            report.records,
        )
    }
}

/// Runs `chain` for each keyword in order.
pub async fn search_many<S: AsRef<str>>(
    chain: &StrategyChain<'_>,
    keywords: &[S],
    pages: u32,
) -> Vec<SearchOutcome> {
    let mut outcomes = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        outcomes.push(chain.search(keyword.as_ref(), pages).await);
    }
    outcomes
}
