//! Records shared between the extraction pipeline and the tool layer.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Placeholder for author and publish time when the page does not carry them.
pub const UNKNOWN: &str = "未知";

/// Response metadata carried alongside the extracted fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ArticleMetadata {
    /// Encoding the body was decoded with (e.g. `UTF-8`).
    pub charset: String,
    /// Content-Type header as sent by the server, or empty.
    pub content_type: String,
}

/// Structured fields pulled out of one article page.
///
/// A field the page does not carry holds its default: empty `title`,
/// `content` and `description`, [`UNKNOWN`] for `author` and `publish_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ArticleRecord {
    pub title: String,
    pub author: String,
    pub publish_time: String,
    /// Visible body text, one block per line.
    pub content: String,
    pub description: String,
    pub metadata: ArticleMetadata,
}

impl Default for ArticleRecord {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: UNKNOWN.to_string(),
            publish_time: UNKNOWN.to_string(),
            content: String::new(),
            description: String::new(),
            metadata: ArticleMetadata::default(),
        }
    }
}

impl ArticleRecord {
    /// Author if the page named one.
    pub fn known_author(&self) -> Option<&str> {
        (!self.author.is_empty() && self.author != UNKNOWN).then_some(self.author.as_str())
    }

    /// Body length in characters.
    pub fn content_length(&self) -> usize {
        self.content.chars().count()
    }
}

/// Prompt template selecting what the LLM is asked to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    /// Viewpoints, structure, argumentation, style and value in one report.
    #[default]
    Comprehensive,
    /// Core argument and its chain of sub-claims.
    Viewpoint,
    /// Organization, transitions, hierarchy and readability.
    Structure,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 3] = [AnalysisType::Comprehensive, AnalysisType::Viewpoint, AnalysisType::Structure];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Comprehensive => "comprehensive",
            AnalysisType::Viewpoint => "viewpoint",
            AnalysisType::Structure => "structure",
        }
    }

    /// Label used in report headers and derived file names.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisType::Comprehensive => "综合分析",
            AnalysisType::Viewpoint => "观点提取",
            AnalysisType::Structure => "结构分析",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AnalysisType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "unsupported analysis_type: {s} (expected comprehensive, viewpoint or structure)"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_defaults() {
        let record = ArticleRecord::default();
        assert_eq!(record.title, "");
        assert_eq!(record.author, UNKNOWN);
        assert_eq!(record.publish_time, UNKNOWN);
        assert_eq!(record.content, "");
        assert_eq!(record.description, "");
        assert!(record.known_author().is_none());
    }

    #[test]
    fn test_content_length_counts_chars() {
        let record = ArticleRecord { content: "微信文章".into(), ..Default::default() };
        assert_eq!(record.content_length(), 4);
    }

    #[test]
    fn test_analysis_type_parse() {
        assert_eq!("structure".parse::<AnalysisType>().unwrap(), AnalysisType::Structure);
        assert_eq!(" Viewpoint ".parse::<AnalysisType>().unwrap(), AnalysisType::Viewpoint);
        assert_eq!("comprehensive".parse::<AnalysisType>().unwrap(), AnalysisType::Comprehensive);
    }

    #[test]
    fn test_analysis_type_rejects_unknown() {
        let err = "sentiment".parse::<AnalysisType>().unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[test]
    fn test_analysis_type_labels() {
        assert_eq!(AnalysisType::Comprehensive.label(), "综合分析");
        assert_eq!(AnalysisType::Viewpoint.label(), "观点提取");
        assert_eq!(AnalysisType::Structure.label(), "结构分析");
        assert_eq!(AnalysisType::default(), AnalysisType::Comprehensive);
    }
}
