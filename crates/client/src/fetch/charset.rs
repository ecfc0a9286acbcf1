//! Response body decoding.
//!
//! Charset resolution order:
//! 1. `charset=` parameter of the Content-Type header
//! 2. `<meta charset>` / `http-equiv` declaration in the first 1024 bytes
//! 3. Statistical detection with chardetng

use std::sync::LazyLock;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use regex::Regex;

const META_SNIFF_BYTES: usize = 1024;

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([a-z0-9_\-:.]+)"#).expect("invalid charset regex")
});

/// Where the charset used for decoding came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharsetSource {
    Header,
    Meta,
    Detected,
}

/// Decoded body text plus the encoding that produced it.
#[derive(Debug, Clone)]
pub struct DecodedBody {
    pub text: String,
    /// Canonical encoding name, e.g. `UTF-8` or `GBK`.
    pub charset: String,
    pub source: CharsetSource,
}

/// Pull the `charset` parameter out of a Content-Type header value.
pub fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|v| !v.is_empty())
    })
}

fn charset_from_meta(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SNIFF_BYTES)];
    let head = String::from_utf8_lossy(head);
    let label = META_CHARSET.captures(&head)?.get(1)?.as_str().to_string();
    Encoding::for_label(label.as_bytes())
}

fn detect(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Decode a response body into text using the declared or detected charset.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> DecodedBody {
    let declared = content_type
        .and_then(charset_from_content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()));

    let (encoding, source) = match declared {
        Some(enc) => (enc, CharsetSource::Header),
        None => match charset_from_meta(bytes) {
            Some(enc) => (enc, CharsetSource::Meta),
            None => (detect(bytes), CharsetSource::Detected),
        },
    };

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(charset = used.name(), ?source, "body contained malformed sequences; replaced");
    }

    DecodedBody { text: text.into_owned(), charset: used.name().to_string(), source }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charset_from_content_type() {
        assert_eq!(charset_from_content_type("text/html; charset=utf-8"), Some("utf-8"));
        assert_eq!(charset_from_content_type("text/html;Charset=\"GBK\""), Some("GBK"));
        assert_eq!(charset_from_content_type("text/html"), None);
        assert_eq!(charset_from_content_type("text/html; charset="), None);
    }

    #[test]
    fn test_decode_declared_utf8() {
        let body = "<p>微信公众平台</p>".as_bytes();
        let decoded = decode_body(body, Some("text/html; charset=utf-8"));
        assert_eq!(decoded.text, "<p>微信公众平台</p>");
        assert_eq!(decoded.charset, "UTF-8");
        assert_eq!(decoded.source, CharsetSource::Header);
    }

    #[test]
    fn test_decode_declared_gbk() {
        let (bytes, _, _) = encoding_rs::GBK.encode("<p>文章正文</p>");
        let decoded = decode_body(&bytes, Some("text/html; charset=gbk"));
        assert_eq!(decoded.text, "<p>文章正文</p>");
        assert_eq!(decoded.charset, "GBK");
    }

    #[test]
    fn test_decode_meta_charset() {
        let html = "<html><head><meta charset=\"gb2312\"></head><body>标题</body></html>";
        let (bytes, _, _) = encoding_rs::GBK.encode(html);
        let decoded = decode_body(&bytes, Some("text/html"));
        assert_eq!(decoded.source, CharsetSource::Meta);
        assert_eq!(decoded.charset, "GBK");
        assert!(decoded.text.contains("标题"));
    }

    #[test]
    fn test_decode_detects_without_declaration() {
        let body = "<html><body><p>这是一段没有声明编码的中文正文内容。</p></body></html>".as_bytes();
        let decoded = decode_body(body, None);
        assert_eq!(decoded.source, CharsetSource::Detected);
        assert_eq!(decoded.charset, "UTF-8");
        assert!(decoded.text.contains("中文正文"));
    }
}
