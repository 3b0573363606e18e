use std::path::PathBuf;

/// Sponsored-products gateway the scraper talks to unless overridden.
pub const DEFAULT_API_BASE_URL: &str =
    "https://hepsiads-gw.hepsiburada.com/sponsored-brands/v2/display/api/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub pacing_min_ms: u64,
    pub pacing_max_ms: u64,
    pub dynamic_pacing_min_ms: u64,
    pub dynamic_pacing_max_ms: u64,
    pub max_consecutive_failures: u32,
    pub dynamic_sessions: usize,
    pub output_dir: PathBuf,
    pub hn_url: String,
    pub page_timeout_secs: u64,
    pub google_api_key: Option<String>,
    pub llm_model: String,
    pub llm_base_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("pacing_min_ms", &self.pacing_min_ms)
            .field("pacing_max_ms", &self.pacing_max_ms)
            .field("dynamic_pacing_min_ms", &self.dynamic_pacing_min_ms)
            .field("dynamic_pacing_max_ms", &self.dynamic_pacing_max_ms)
            .field("max_consecutive_failures", &self.max_consecutive_failures)
            .field("dynamic_sessions", &self.dynamic_sessions)
            .field("output_dir", &self.output_dir)
            .field("hn_url", &self.hn_url)
            .field("page_timeout_secs", &self.page_timeout_secs)
            .field(
                "google_api_key",
                &self.google_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("llm_model", &self.llm_model)
            .field("llm_base_url", &self.llm_base_url)
            .finish()
    }
}
