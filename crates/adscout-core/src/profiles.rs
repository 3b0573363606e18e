//! Request identities ("header profiles") presented to the sponsored-products API.
//!
//! A [`HeaderProfile`] is a value: every derivation (`with_header`,
//! `for_keyword`, `session_variant`) returns a new profile and leaves the
//! original untouched, so one profile can safely seed several runs.

/// Storefront search page the advanced profile claims to come from.
pub const SEARCH_REFERER_BASE: &str = "https://www.hepsiburada.com/ara?q=";

const SIMPLE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36";

/// A named, ordered set of HTTP request headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderProfile {
    name: String,
    headers: Vec<(String, String)>,
}

impl HeaderProfile {
    #[must_use]
    pub fn new(name: impl Into<String>, headers: Vec<(String, String)>) -> Self {
        Self {
            name: name.into(),
            headers,
        }
    }

    /// Bare user-agent only. Least conspicuous, so it is tried first.
    #[must_use]
    pub fn simple() -> Self {
        Self::new(
            "simple",
            vec![("User-Agent".to_string(), SIMPLE_USER_AGENT.to_string())],
        )
    }

    /// Full browser replay of a Chrome XHR from the storefront search page.
    ///
    /// The `authorization` header carries the literal placeholder the
    /// storefront itself sends for anonymous visitors.
    #[must_use]
    pub fn advanced() -> Self {
        let pairs = [
            ("accept", "application/json, text/plain, */*"),
            ("accept-language", "tr-TR,tr;q=0.9,en-US;q=0.8,en;q=0.7"),
            ("authorization", "Bearer undefined"),
            ("cache-control", "no-cache"),
            ("hb-source-app", "hepsi-ads-spon-brands"),
            ("origin", "https://www.hepsiburada.com"),
            ("priority", "u=1, i"),
            ("referer", "https://www.hepsiburada.com/ara?q=laptop"),
            (
                "sec-ch-ua",
                "\"Not;A=Brand\";v=\"99\", \"Google Chrome\";v=\"139\", \"Chromium\";v=\"139\"",
            ),
            ("sec-ch-ua-mobile", "?0"),
            ("sec-ch-ua-platform", "\"Windows\""),
            ("sec-fetch-dest", "empty"),
            ("sec-fetch-mode", "cors"),
            ("sec-fetch-site", "same-site"),
            ("user-agent", CHROME_USER_AGENT),
        ];
        Self::new(
            "advanced",
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Headers in presentation order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a copy with `name` set to `value`.
    ///
    /// An existing header with the same name (case-insensitive) keeps its
    /// position and spelling; otherwise the header is appended.
    #[must_use]
    pub fn with_header(&self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        let mut headers = self.headers.clone();
        match headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some(slot) => slot.1 = value,
            None => headers.push((name.to_string(), value)),
        }
        Self {
            name: self.name.clone(),
            headers,
        }
    }

    /// Points the referer at the storefront search page for `keyword`.
    ///
    /// Profiles without a referer are returned unchanged.
    #[must_use]
    pub fn for_keyword(&self, keyword: &str) -> Self {
        if self.get("referer").is_none() {
            return self.clone();
        }
        self.with_header("referer", format!("{SEARCH_REFERER_BASE}{keyword}"))
    }

    /// Derives the `n`-th rotating session identity from this profile by
    /// suffixing the user-agent with ` Session-<n>`.
    #[must_use]
    pub fn session_variant(&self, n: usize) -> Self {
        let user_agent = self.get("user-agent").unwrap_or_default();
        let mut variant = self.with_header("User-Agent", format!("{user_agent} Session-{n}"));
        variant.name = format!("{}-session-{n}", self.name);
        variant
    }
}
