//! HTTP client adapter for the sponsored-products display API.
//!
//! The adapter never retries and never interprets status codes: every HTTP
//! response comes back as a [`RawResponse`], and only transport failures are
//! errors. Retry and escalation belong to the pagination driver and the
//! strategy chain.

mod headers;

use std::time::Duration;

use adscout_core::HeaderProfile;
use reqwest::{Client, Url};

use crate::error::ScraperError;

pub use headers::header_map;

/// Upper bound on TCP/TLS connection setup, independent of the request timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Status and body of one HTTP exchange, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// A long-lived client identity used by the dynamic strategy: its own
/// connection pool and cookie jar, with the profile installed as default headers.
#[derive(Debug)]
pub struct Session {
    client: Client,
    profile: HeaderProfile,
}

impl Session {
    #[must_use]
    pub fn profile(&self) -> &HeaderProfile {
        &self.profile
    }
}

/// GET-only client for `<base_url>/<keyword>?page=N&platform=desktop`.
pub struct AdsClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl AdsClient {
    /// Creates an `AdsClient` with a per-request timeout of `timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute hierarchical URL, or [`ScraperError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ScraperError> {
        let parsed = Url::parse(base_url).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ScraperError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot carry path segments".to_owned(),
            });
        }

        let timeout = Duration::from_secs(timeout_secs);
        let client = build_http_client(timeout, None)?;
        Ok(Self {
            client,
            base_url: parsed,
            timeout,
        })
    }

    /// Fetches one listing page using `profile` as the request headers.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidHeader`]: the profile holds a header that
    ///   cannot be sent on the wire.
    /// - [`ScraperError::Http`]: connection failure, timeout, or a body that
    ///   could not be read.
    pub async fn fetch_page(
        &self,
        profile: &HeaderProfile,
        keyword: &str,
        page: u32,
    ) -> Result<RawResponse, ScraperError> {
        let headers = header_map(profile)?;
        let url = self.page_url(keyword, page);
        tracing::debug!(profile = profile.name(), %url, "requesting listing page");
        let response = self.client.get(url).headers(headers).send().await?;
        read_response(response).await
    }

    /// Builds `count` independent sessions from `base`, numbered from 1.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidHeader`] or [`ScraperError::Http`] if any
    /// session client cannot be built.
    pub fn open_sessions(
        &self,
        base: &HeaderProfile,
        count: usize,
    ) -> Result<Vec<Session>, ScraperError> {
        (1..=count)
            .map(|n| {
                let profile = base.session_variant(n);
                let client = build_http_client(self.timeout, Some(header_map(&profile)?))?;
                Ok(Session { client, profile })
            })
            .collect()
    }

    /// Fetches one listing page through `session`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] on transport failure.
    pub async fn fetch_page_in(
        &self,
        session: &Session,
        keyword: &str,
        page: u32,
    ) -> Result<RawResponse, ScraperError> {
        let url = self.page_url(keyword, page);
        tracing::debug!(profile = session.profile.name(), %url, "requesting listing page");
        let response = session.client.get(url).send().await?;
        read_response(response).await
    }

    /// `<base_url>/<keyword>?page=<page>&platform=desktop`, with the keyword
    /// percent-encoded as a single path segment.
    fn page_url(&self, keyword: &str, page: u32) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(keyword);
        }
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("platform", "desktop");
        url
    }
}

fn build_http_client(
    timeout: Duration,
    default_headers: Option<reqwest::header::HeaderMap>,
) -> Result<Client, ScraperError> {
    let mut builder = Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT)
        .cookie_store(true);
    if let Some(headers) = default_headers {
        builder = builder.default_headers(headers);
    }
    Ok(builder.build()?)
}

async fn read_response(response: reqwest::Response) -> Result<RawResponse, ScraperError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok(RawResponse { status, body })
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
