//! Result shapes returned by the pipeline entry points.

use schemars::JsonSchema;
use serde::Serialize;
use wxmp_core::{AnalysisType, ArticleMetadata, ErrorEnvelope};

/// Success message for a completed analysis.
pub const ANALYSIS_COMPLETED: &str = "LLM analysis completed successfully";

/// Method tag reported with every analysis.
pub const ANALYSIS_METHOD: &str = "LLM semantic analysis";

/// Successful `parse_article` payload.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ArticleSummary {
    /// Always `true`.
    pub success: bool,
    pub url: String,
    pub title: String,
    pub author: String,
    pub publish_time: String,
    pub description: String,
    /// Long-form LLM summary.
    pub summary: String,
    pub metadata: ArticleMetadata,
    /// Saved summary path, when `save_summary` was set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ArticleInfo {
    pub title: String,
    pub author: String,
    /// Body length in characters.
    pub content_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct AnalysisInfo {
    #[serde(rename = "type")]
    pub analysis_type: AnalysisType,
    pub model: String,
    pub provider: String,
    pub method: String,
}

/// Successful `analyze_with_llm` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct AnalysisReport {
    /// Always `true`.
    pub success: bool,
    pub message: String,
    /// Absolute path of the written report.
    pub file_path: String,
    pub file_size: u64,
    pub article_info: ArticleInfo,
    pub analysis_info: AnalysisInfo,
}

/// Outcome of `parse_article`.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum ParseResult {
    Completed(ArticleSummary),
    Failed(ErrorEnvelope),
}

/// Outcome of `analyze_with_llm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum AnalysisResult {
    Completed(AnalysisReport),
    Failed(ErrorEnvelope),
}

impl ParseResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Error envelope, if the call failed.
    pub fn error(&self) -> Option<&ErrorEnvelope> {
        match self {
            Self::Completed(_) => None,
            Self::Failed(envelope) => Some(envelope),
        }
    }
}

impl AnalysisResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Error envelope, if the call failed.
    pub fn error(&self) -> Option<&ErrorEnvelope> {
        match self {
            Self::Completed(_) => None,
            Self::Failed(envelope) => Some(envelope),
        }
    }
}
