use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("no readable content at {url}")]
    NoContent { url: String },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
