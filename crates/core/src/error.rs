//! Unified error types for mcp-wechat.
//!
//! Every variant renders with a stable code prefix so that tool callers can
//! branch on the code without parsing the message.

/// Unified error types for the mcp-wechat pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid URL, unsupported scheme, or host outside the allowed set.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Network failure while fetching the article.
    #[error("FETCH_ERROR: {0}")]
    FetchFailed(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Non-success HTTP status from the article host.
    #[error("HTTP_ERROR: status {status}")]
    HttpStatus { status: u16 },

    /// The page could not be parsed as HTML at all.
    #[error("EXTRACT_FAILED: {0}")]
    ExtractFailed(String),

    /// A required parameter was not supplied.
    #[error("MISSING_INPUT: {0}")]
    MissingInput(String),

    /// A parameter was supplied with an unsupported value.
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// LLM credentials are not configured.
    #[error("LLM_CONFIG_ERROR: {0}")]
    LlmConfig(String),

    /// The LLM endpoint failed or returned an unusable body.
    #[error("LLM_REQUEST_ERROR: {0}")]
    LlmRequest(String),

    /// Writing the output file failed.
    #[error("WRITE_ERROR: {0}")]
    WriteFailed(String),
}

impl Error {
    /// Stable machine-readable code for the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::FetchFailed(_) => "FETCH_ERROR",
            Error::FetchTimeout(_) => "FETCH_TIMEOUT",
            Error::FetchTooLarge(_) => "FETCH_TOO_LARGE",
            Error::HttpStatus { status: 404 } => "NOT_FOUND",
            Error::HttpStatus { .. } => "HTTP_ERROR",
            Error::ExtractFailed(_) => "EXTRACT_FAILED",
            Error::MissingInput(_) => "MISSING_INPUT",
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::LlmConfig(_) => "LLM_CONFIG_ERROR",
            Error::LlmRequest(_) => "LLM_REQUEST_ERROR",
            Error::WriteFailed(_) => "WRITE_ERROR",
        }
    }

    /// Human-readable message without the code prefix.
    pub fn message(&self) -> String {
        match self {
            Error::InvalidUrl(msg)
            | Error::FetchFailed(msg)
            | Error::FetchTimeout(msg)
            | Error::FetchTooLarge(msg)
            | Error::ExtractFailed(msg)
            | Error::MissingInput(msg)
            | Error::InvalidInput(msg)
            | Error::LlmConfig(msg)
            | Error::LlmRequest(msg)
            | Error::WriteFailed(msg) => msg.clone(),
            Error::HttpStatus { status: 404 } => "Article not found. Please check the URL.".to_string(),
            Error::HttpStatus { status } => format!("article host responded with status {status}"),
        }
    }
}
