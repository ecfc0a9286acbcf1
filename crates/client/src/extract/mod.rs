//! Article field extraction from WeChat article pages.
//!
//! ### Algorithm
//! - Parse HTML into a DOM tree with scraper.
//! - For each field, try an ordered list of selector strategies (see [`fields`]).
//! - A field no strategy finds falls back to its default; it never fails the page.
//!
//! ### Stable Abstraction
//! - Uses the `Extractor` trait so the pipeline does not depend on the concrete engine.
//!
//! ### Failure
//! - Only a page that cannot be treated as HTML at all (empty, no markup) is an error.

pub mod fields;
pub mod text;

pub use fields::{FieldStrategy, first_match};

use scraper::Html;
use wxmp_core::{ArticleMetadata, ArticleRecord, Error};

use crate::fetch::RawPage;

/// Stable extractor trait for article pages.
///
/// This allows swapping the extraction engine later without changing pipeline code.
pub trait Extractor: Send + Sync {
    /// Extract structured fields from a fetched page.
    fn extract(&self, page: &RawPage) -> Result<ArticleRecord, Error>;
}

/// Selector-chain extractor for `mp.weixin.qq.com` article markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct WechatExtractor;

impl WechatExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for WechatExtractor {
    fn extract(&self, page: &RawPage) -> Result<ArticleRecord, Error> {
        let html = page.html.trim();
        if html.is_empty() {
            return Err(Error::ExtractFailed("failed to parse HTML: document is empty".into()));
        }
        if !html.contains('<') {
            return Err(Error::ExtractFailed("failed to parse HTML: no markup found".into()));
        }

        let doc = Html::parse_document(html);
        let defaults = ArticleRecord::default();

        let record = ArticleRecord {
            title: first_match(&doc, fields::TITLE_STRATEGIES).unwrap_or(defaults.title),
            author: first_match(&doc, fields::AUTHOR_STRATEGIES).unwrap_or(defaults.author),
            publish_time: first_match(&doc, fields::PUBLISH_TIME_STRATEGIES).unwrap_or(defaults.publish_time),
            content: first_match(&doc, fields::CONTENT_STRATEGIES).unwrap_or(defaults.content),
            description: first_match(&doc, fields::DESCRIPTION_STRATEGIES).unwrap_or(defaults.description),
            metadata: ArticleMetadata { charset: page.charset.clone(), content_type: page.content_type.clone() },
        };

        tracing::debug!(
            title = %record.title,
            author = %record.author,
            content_chars = record.content_length(),
            "extracted article fields"
        );

        Ok(record)
    }
}

/// Extract an article using the default extractor.
pub fn extract_article(page: &RawPage) -> Result<ArticleRecord, Error> {
    WechatExtractor::new().extract(page)
}
