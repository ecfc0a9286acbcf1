//! analyze_with_llm tool implementation.
//!
//! Runs a deep LLM analysis of an article, given either its URL or its
//! title and content, and writes the report as Markdown.

use std::path::PathBuf;

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use wxmp_client::{AnalysisRequest, Pipeline};

use crate::error::into_call_result;

/// Input parameters for analyze_with_llm tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeWithLlmParams {
    /// WeChat article URL. Takes precedence over title/author/content.
    #[serde(default)]
    pub url: Option<String>,

    /// Article title (required without url).
    #[serde(default)]
    pub title: Option<String>,

    /// Article author.
    #[serde(default)]
    pub author: Option<String>,

    /// Article body text (required without url).
    #[serde(default)]
    pub content: Option<String>,

    /// Report path; defaults to `{title}-LLM{type label}.md` in the output directory.
    #[serde(default)]
    pub save_path: Option<String>,

    /// Model name (default: glm-4).
    #[serde(default)]
    pub model: Option<String>,

    /// "comprehensive" (default), "viewpoint" or "structure".
    #[serde(default)]
    pub analysis_type: Option<String>,
}

impl From<AnalyzeWithLlmParams> for AnalysisRequest {
    fn from(params: AnalyzeWithLlmParams) -> Self {
        Self {
            url: params.url,
            title: params.title,
            author: params.author,
            content: params.content,
            save_path: params.save_path.filter(|p| !p.trim().is_empty()).map(PathBuf::from),
            model: params.model,
            analysis_type: params.analysis_type,
        }
    }
}

/// Implementation of the analyze_with_llm tool.
pub async fn analyze_impl(pipeline: &Pipeline, params: AnalyzeWithLlmParams) -> Result<CallToolResult, McpError> {
    tracing::info!(
        "analyze_with_llm: url={:?}, analysis_type={:?}, model={:?}",
        params.url,
        params.analysis_type,
        params.model
    );

    let outcome = pipeline.run_analysis(params.into()).await;
    into_call_result(&outcome)
}
