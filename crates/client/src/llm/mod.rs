//! Zhipu AI chat-completion client.
//!
//! Builds prompts from extracted article text and sends a single
//! non-streaming chat-completion request per call.
//!
//! ### Specification
//!
//! - **Endpoint**: `{base_url}/chat/completions` (default `https://open.bigmodel.cn/api/paas/v4`)
//! - **Authentication**: `Authorization: Bearer <ZHIPU_API_KEY>`; the key is checked before any I/O.
//! - **Input cap**: article text is cut at a fixed character count before prompt assembly.
//! - **Failures**: `LlmConfig` without a key, `LlmRequest` on network errors, non-2xx
//!   status or a body missing `choices[0].message.content`. No retries.

pub mod prompt;
pub mod request;
pub mod response;

pub use prompt::{TOO_SHORT_SUMMARY, build_analysis_prompt, build_summary_prompt, strip_code_fences};
pub use request::{ChatMessage, ChatRequest};
pub use response::ChatResponse;

use std::fmt;
use std::time::{Duration, Instant};

use wxmp_core::{AnalysisType, AppConfig, Error};

/// Provider name reported in analysis results.
pub const PROVIDER: &str = "zhipu";

/// Token budget for the long summary.
const SUMMARY_MAX_TOKENS: u32 = 1500;

/// Token budget for analysis reports.
const ANALYSIS_MAX_TOKENS: u32 = 4000;

const TEMPERATURE: f32 = 0.3;

/// LLM client configuration.
#[derive(Clone)]
pub struct LlmConfig {
    /// API key from ZHIPU_API_KEY; `None` disables LLM calls.
    pub api_key: Option<String>,
    /// Base URL of the chat-completions API.
    pub base_url: String,
    /// Request timeout (default: 120s).
    pub timeout: Duration,
    /// Character cap on article text in the summary prompt.
    pub summary_input_chars: usize,
    /// Character cap on article text in analysis prompts.
    pub analysis_input_chars: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for LlmConfig {
    fn from(app: &AppConfig) -> Self {
        Self {
            api_key: app.require_api_key().ok().map(str::to_string),
            base_url: app.llm_base_url.clone(),
            timeout: app.llm_timeout(),
            summary_input_chars: app.summary_input_chars,
            analysis_input_chars: app.analysis_input_chars,
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("summary_input_chars", &self.summary_input_chars)
            .field("analysis_input_chars", &self.analysis_input_chars)
            .finish()
    }
}

/// Summaries and analyses backed by the chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct Summarizer {
    http: reqwest::Client,
    config: LlmConfig,
}

impl Summarizer {
    /// Create a new summarizer. A missing key is not an error until a call needs it.
    pub fn new(config: LlmConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::LlmRequest(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Long-form summary of an article body.
    ///
    /// Bodies under 100 characters return [`TOO_SHORT_SUMMARY`] without a request.
    pub async fn summarize(&self, text: &str, title: &str, model: &str) -> Result<String, Error> {
        if text.trim().chars().count() < prompt::MIN_SUMMARY_CHARS {
            return Ok(TOO_SHORT_SUMMARY.to_string());
        }

        let prompt = build_summary_prompt(title, text, self.config.summary_input_chars);
        let summary = self.complete(&prompt, model, SUMMARY_MAX_TOKENS).await?;
        Ok(summary.trim().to_string())
    }

    /// Deep analysis of an article in the requested mode, code fences removed.
    pub async fn analyze(
        &self, text: &str, title: &str, author: &str, analysis_type: AnalysisType, model: &str,
    ) -> Result<String, Error> {
        let prompt = build_analysis_prompt(analysis_type, title, author, text, self.config.analysis_input_chars);
        let output = self.complete(&prompt, model, ANALYSIS_MAX_TOKENS).await?;
        Ok(strip_code_fences(&output))
    }

    /// Send one chat-completion request and return the first choice's text.
    async fn complete(&self, prompt: &str, model: &str, max_tokens: u32) -> Result<String, Error> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            Error::LlmConfig(
                "ZHIPU_API_KEY not found. Please set ZHIPU_API_KEY environment variable in MCP configuration."
                    .into(),
            )
        })?;

        let start = Instant::now();
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let body = ChatRequest::new(model, prompt, max_tokens, TEMPERATURE);

        tracing::info!("calling LLM: model={}, prompt_chars={}", model, prompt.chars().count());

        let http_response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::LlmRequest(format!("request timed out after {:?}", self.config.timeout))
                } else {
                    Error::LlmRequest(format!("network error: {}", e))
                }
            })?;

        let status = http_response.status();
        tracing::debug!("LLM response status: {}", status);

        let bytes = http_response
            .bytes()
            .await
            .map_err(|e| Error::LlmRequest(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            let detail = String::from_utf8_lossy(&bytes);
            return Err(Error::LlmRequest(format!(
                "LLM endpoint responded with status {}: {}",
                status.as_u16(),
                prompt::truncate_chars(detail.trim(), 200)
            )));
        }

        let content = ChatResponse::from_slice(&bytes)?.into_content()?;

        tracing::debug!("LLM completion received in {:?}, {} chars", start.elapsed(), content.chars().count());

        Ok(content)
    }
}
