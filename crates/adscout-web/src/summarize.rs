//! Fetch an arbitrary web page, reduce it to readable text, and ask an LLM
//! a question about it.

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, Url};
use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};

use crate::error::WebError;

/// Longest page text, in characters, forwarded to the model.
const MAX_CONTENT_CHARS: usize = 10_000;
const TRUNCATION_MARKER: &str = "\n\n[Content truncated...]";

/// Elements whose text is navigation or code rather than page content.
const STRIPPED_ELEMENTS: [&str; 4] = ["script", "style", "nav", "footer"];

const PAGE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Generation can take far longer than a page fetch.
const LLM_TIMEOUT: Duration = Duration::from_secs(60);
const LLM_TEMPERATURE: f64 = 0.1;

/// Prepends `https://` when `input` carries no scheme.
#[must_use]
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    }
}

/// Downloads pages with browser-like headers and extracts their visible text.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// # Errors
    ///
    /// Returns [`WebError::Http`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: u64) -> Result<Self, WebError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(PAGE_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `url` and returns its cleaned, possibly truncated, text.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::Http`] on transport failure or
    /// [`WebError::Status`] for a non-2xx response.
    pub async fn fetch_text(&self, url: &str) -> Result<String, WebError> {
        tracing::info!(url, "fetching page");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WebError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }
        let html = response.text().await?;
        let text = truncate_content(&visible_text(&html));
        tracing::info!(url, chars = text.chars().count(), "extracted page text");
        Ok(text)
    }
}

/// Text of `html` minus [`STRIPPED_ELEMENTS`] subtrees, one trimmed
/// non-blank line per source line.
#[must_use]
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if STRIPPED_ELEMENTS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}

fn truncate_content(text: &str) -> String {
    if text.chars().count() <= MAX_CONTENT_CHARS {
        return text.to_owned();
    }
    let mut truncated: String = text.chars().take(MAX_CONTENT_CHARS).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

/// The analyst prompt sent for every page.
#[must_use]
pub fn build_analysis_prompt(content: &str, question: &str) -> String {
    format!(
        "You are a helpful web content analyst. Please analyze the following webpage content and respond to the user's request.\n\
         \n\
         User Request: {question}\n\
         \n\
         Webpage Content:\n\
         {content}\n\
         \n\
         Instructions:\n\
         - Focus specifically on what the user asked for\n\
         - Provide clear, structured information\n\
         - If the requested information isn't available, say so clearly\n\
         - Be concise but comprehensive\n\
         - Use bullet points or numbered lists when appropriate\n"
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Minimal client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns [`WebError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, model: &str, api_key: String) -> Result<Self, WebError> {
        let client = Client::builder().timeout(LLM_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            model: model.to_owned(),
            api_key,
        })
    }

    /// Sends `prompt` as a single user turn and returns the first
    /// candidate's text.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::Llm`] for a non-2xx response, an unparseable body,
    /// or a response with no text.
    pub async fn generate(&self, prompt: &str) -> Result<String, WebError> {
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let mut url = Url::parse(&endpoint)
            .map_err(|e| WebError::Llm(format!("invalid endpoint {endpoint}: {e}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);

        let request = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: LLM_TEMPERATURE,
            },
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "calling LLM");
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| WebError::Llm(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(200).collect();
            return Err(WebError::Llm(format!("model returned {status}: {excerpt}")));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| WebError::Llm(format!("response parse error: {}", e.without_url())))?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(WebError::Llm("response contained no text".to_owned()));
        }
        Ok(text)
    }
}

/// Result of [`summarize_page`].
#[derive(Debug, Clone)]
pub struct PageSummary {
    pub url: String,
    pub content: String,
    pub analysis: String,
    /// Length of `content` in characters.
    pub content_length: usize,
    pub elapsed: Duration,
}

/// Fetches `url`, then asks `llm` to answer `question` about its text.
///
/// # Errors
///
/// Propagates fetch and model errors. Returns [`WebError::NoContent`] without
/// calling the model when the page has no visible text.
pub async fn summarize_page(
    fetcher: &PageFetcher,
    llm: &GeminiClient,
    url: &str,
    question: &str,
) -> Result<PageSummary, WebError> {
    let started = Instant::now();
    let url = normalize_url(url);

    let content = fetcher.fetch_text(&url).await?;
    if content.is_empty() {
        return Err(WebError::NoContent { url });
    }

    let analysis = llm
        .generate(&build_analysis_prompt(&content, question))
        .await?;
    let elapsed = started.elapsed();
    tracing::info!(url = %url, elapsed_ms = elapsed.as_millis(), "page analysed");

    Ok(PageSummary {
        content_length: content.chars().count(),
        url,
        content,
        analysis,
        elapsed,
    })
}
