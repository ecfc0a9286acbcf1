//! parse_article tool implementation.
//!
//! Fetches a WeChat article, extracts its fields and returns them together
//! with a long-form LLM summary.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use wxmp_client::Pipeline;

use crate::error::into_call_result;

/// Input parameters for parse_article tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ParseArticleParams {
    /// WeChat article URL (mp.weixin.qq.com).
    pub url: String,

    /// Also write the summary as Markdown into the output directory (default: true).
    /// Accepts a boolean or one of "true"/"1"/"yes"/"on"; anything else means false.
    #[serde(default = "default_true", deserialize_with = "deserialize_flag")]
    #[schemars(with = "bool")]
    pub save_summary: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Number(i64),
    Text(String),
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(value)) => value,
        Some(Flag::Number(value)) => value == 1,
        Some(Flag::Text(value)) => matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on"),
        None => false,
    })
}

/// Implementation of the parse_article tool.
pub async fn parse_article_impl(pipeline: &Pipeline, params: ParseArticleParams) -> Result<CallToolResult, McpError> {
    tracing::info!("parse_article: url={}, save_summary={}", params.url, params.save_summary);

    let outcome = pipeline.parse_article(&params.url, params.save_summary).await;
    into_call_result(&outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use wxmp_core::AppConfig;

    fn save_summary_from(raw: &str) -> bool {
        let json = format!(r#"{{"url": "https://mp.weixin.qq.com/s/abc", "save_summary": {raw}}}"#);
        serde_json::from_str::<ParseArticleParams>(&json).unwrap().save_summary
    }

    #[test]
    fn test_params_default_save_summary() {
        let params: ParseArticleParams = serde_json::from_str(r#"{"url": "https://mp.weixin.qq.com/s/abc"}"#).unwrap();
        assert!(params.save_summary);
    }

    #[test]
    fn test_params_save_summary_accepts_strings_and_bools() {
        for raw in [r#""true""#, r#""1""#, r#""YES""#, r#"" on ""#, "true", "1"] {
            assert!(save_summary_from(raw), "{raw} should enable saving");
        }
        for raw in [r#""false""#, r#""0""#, r#""no""#, r#""""#, "false", "0", "null"] {
            assert!(!save_summary_from(raw), "{raw} should disable saving");
        }
    }

    #[tokio::test]
    async fn test_foreign_host_returns_error_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let pipeline = Pipeline::from_config(&AppConfig::default()).unwrap();
        let params = ParseArticleParams { url: format!("{}/s/abc", server.uri()), save_summary: false };

        let result = parse_article_impl(&pipeline, params).await.unwrap();

        assert!(result.is_error.unwrap_or(false));
        assert!(serde_json::to_string(&result).unwrap().contains("INVALID_URL"));
    }

    #[tokio::test]
    async fn test_empty_url_returns_error_result() {
        let pipeline = Pipeline::from_config(&AppConfig::default()).unwrap();
        let params = ParseArticleParams { url: "  ".into(), save_summary: true };

        let result = parse_article_impl(&pipeline, params).await.unwrap();

        assert!(result.is_error.unwrap_or(false));
        assert!(serde_json::to_string(&result).unwrap().contains("INVALID_URL"));
    }
}
