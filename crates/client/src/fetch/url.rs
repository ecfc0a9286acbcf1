//! URL canonicalization and article-host validation.

/// Error type for URL canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("URL cannot be empty. Please provide a valid WeChat article URL.")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("host {0} is not an article host. Please provide a URL from mp.weixin.qq.com")]
    HostNotAllowed(String),
}

/// Canonicalize a URL string before the host check.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Default scheme to https:// if missing
/// 3. Lowercase the host
/// 4. Remove fragment (#...)
/// 5. Keep query string intact (article links carry their identity there)
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

    let mut parsed = url::Url::parse(&url_str).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str() {
        let lowered = host.to_lowercase();
        parsed
            .set_host(Some(&lowered))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Canonicalize `input` and require its host to be one of `allowed_hosts`.
///
/// Hosts match exactly, ignoring case. No network I/O happens here.
pub fn validate_article_url(input: &str, allowed_hosts: &[String]) -> Result<url::Url, UrlError> {
    let url = canonicalize(input)?;
    let host = url.host_str().ok_or_else(|| UrlError::InvalidUrl("URL has no host".into()))?;

    if allowed_hosts.iter().any(|allowed| allowed.trim().eq_ignore_ascii_case(host)) {
        Ok(url)
    } else {
        Err(UrlError::HostNotAllowed(host.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wechat_hosts() -> Vec<String> {
        vec!["mp.weixin.qq.com".into(), "weixin.qq.com".into()]
    }

    #[test]
    fn test_canonicalize_basic() {
        let url = canonicalize("https://mp.weixin.qq.com/s/abc").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("mp.weixin.qq.com"));
        assert_eq!(url.path(), "/s/abc");
    }

    #[test]
    fn test_canonicalize_default_scheme() {
        let url = canonicalize("mp.weixin.qq.com/s/abc").unwrap();
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn test_canonicalize_lowercase_host() {
        let url = canonicalize("https://MP.WEIXIN.QQ.COM/s/abc").unwrap();
        assert_eq!(url.host_str(), Some("mp.weixin.qq.com"));
    }

    #[test]
    fn test_canonicalize_keeps_query_drops_fragment() {
        let url = canonicalize("https://mp.weixin.qq.com/s?__biz=MzA&mid=1&idx=1#rd").unwrap();
        assert_eq!(url.query(), Some("__biz=MzA&mid=1&idx=1"));
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_canonicalize_unsupported_scheme() {
        let result = canonicalize("file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_canonicalize_empty() {
        assert!(matches!(canonicalize(""), Err(UrlError::Empty)));
        assert!(matches!(canonicalize("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_validate_allowed_hosts() {
        assert!(validate_article_url("https://mp.weixin.qq.com/s/abc", &wechat_hosts()).is_ok());
        assert!(validate_article_url("http://weixin.qq.com/r/xyz", &wechat_hosts()).is_ok());
    }

    #[test]
    fn test_validate_rejects_other_hosts() {
        let result = validate_article_url("https://example.com/s/abc", &wechat_hosts());
        assert!(matches!(result, Err(UrlError::HostNotAllowed(host)) if host == "example.com"));
    }

    #[test]
    fn test_validate_rejects_lookalike_hosts() {
        let hosts = wechat_hosts();
        assert!(validate_article_url("https://mp.weixin.qq.com.evil.example/s/abc", &hosts).is_err());
        assert!(validate_article_url("https://evil.example/?u=mp.weixin.qq.com", &hosts).is_err());
    }
}
