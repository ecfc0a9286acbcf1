//! HTTP fetch pipeline for article pages.
//!
//! ### URL Validation
//! - Trim whitespace, ensure scheme (default: `https`)
//! - Lowercase host, remove fragments, preserve query string
//! - Host must be one of the configured article hosts; checked before any I/O
//!
//! ### Request
//! - Desktop browser User-Agent and `Accept`/`Accept-Language` headers
//! - Max redirects: 5, bounded timeout, max body bytes (configurable)
//! - No retries; callers decide whether to try again
//!
//! ### Decoding
//! - Declared charset, then `<meta charset>`, then detection

pub mod charset;
pub mod url;

use reqwest::{Client, header};
use std::time::{Duration, Instant};

pub use charset::{CharsetSource, DecodedBody, decode_body};
pub use self::url::{UrlError, canonicalize, validate_article_url};

use wxmp_core::{AppConfig, Error};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: desktop Chrome)
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 10s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    /// Hosts article URLs may point at
    pub allowed_hosts: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let app = AppConfig::default();
        let timeout = app.timeout();
        Self {
            user_agent: app.user_agent,
            max_bytes: app.max_bytes,
            timeout,
            max_redirects: 5,
            allowed_hosts: app.allowed_hosts,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(app: &AppConfig) -> Self {
        Self {
            user_agent: app.user_agent.clone(),
            max_bytes: app.max_bytes,
            timeout: app.timeout(),
            allowed_hosts: app.allowed_hosts.clone(),
            ..Default::default()
        }
    }
}

/// One fetched article page, decoded to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    /// Decoded HTML
    pub html: String,
    /// Encoding used to decode the body
    pub charset: String,
    /// Content-Type header, or empty if the server sent none
    pub content_type: String,
}

impl RawPage {
    /// Build a page from HTML already in memory.
    pub fn from_html(html: impl Into<String>) -> Self {
        Self { html: html.into(), charset: "UTF-8".into(), content_type: "text/html; charset=utf-8".into() }
    }
}

/// HTTP fetch client restricted to article hosts.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(header::ACCEPT_LANGUAGE, header::HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"));
        headers.insert(header::UPGRADE_INSECURE_REQUESTS, header::HeaderValue::from_static("1"));

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::FetchFailed(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Check `url_str` against the article hosts without fetching it.
    pub fn validate(&self, url_str: &str) -> Result<reqwest::Url, Error> {
        validate_article_url(url_str, &self.config.allowed_hosts).map_err(|e| Error::InvalidUrl(e.to_string()))
    }

    /// Fetch an article page and decode it.
    ///
    /// Fails with `InvalidUrl` before any network I/O when the host is not allowed.
    pub async fn fetch(&self, url_str: &str) -> Result<RawPage, Error> {
        let start = Instant::now();
        let url = self.validate(url_str)?;

        tracing::info!("fetching article from {}", url);

        let response = self.http.get(url.as_str()).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::FetchTimeout(format!("request to {} timed out after {:?}", url, self.config.timeout))
            } else {
                Error::FetchFailed(format!("network error: {}", e))
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            return Err(Error::HttpStatus { status: status.as_u16() });
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                Error::FetchTimeout(format!("reading body from {} timed out", url))
            } else {
                Error::FetchFailed(format!("failed to read response: {}", e))
            }
        })?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        let decoded = decode_body(&bytes, content_type.as_deref());

        tracing::debug!(
            "fetched {} in {}ms ({} bytes, charset {} from {:?})",
            url,
            start.elapsed().as_millis(),
            bytes.len(),
            decoded.charset,
            decoded.source
        );

        Ok(RawPage { html: decoded.text, charset: decoded.charset, content_type: content_type.unwrap_or_default() })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}
