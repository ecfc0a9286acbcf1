//! Tool result conversion for the mcp-wechat server.
//!
//! Pipeline outcomes are always returned as JSON text content. Failures keep
//! the `{success: false, error: {code, message}}` envelope and also set the
//! MCP `is_error` flag; protocol-level errors are reserved for results that
//! cannot be serialized.

use rmcp::model::{CallToolResult, Content, ErrorData as McpError};
use serde::Serialize;
use wxmp_client::{AnalysisResult, ParseResult};

/// A pipeline outcome that can be sent back as a tool result.
pub trait ToolOutcome: Serialize {
    fn is_failure(&self) -> bool;
}

impl ToolOutcome for ParseResult {
    fn is_failure(&self) -> bool {
        !self.is_success()
    }
}

impl ToolOutcome for AnalysisResult {
    fn is_failure(&self) -> bool {
        !self.is_success()
    }
}

/// Serialize `outcome` as pretty JSON text content.
pub fn into_call_result<T: ToolOutcome>(outcome: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(outcome)
        .map_err(|e| McpError::internal_error(format!("failed to serialize tool result: {e}"), None))?;
    let content = vec![Content::text(text)];

    Ok(if outcome.is_failure() { CallToolResult::error(content) } else { CallToolResult::success(content) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wxmp_core::ErrorEnvelope;

    #[test]
    fn test_failure_sets_is_error() {
        let outcome = ParseResult::Failed(ErrorEnvelope::new("INVALID_URL", "host not allowed"));
        let result = into_call_result(&outcome).unwrap();

        assert_eq!(result.is_error, Some(true));
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("INVALID_URL"));
        assert!(json.contains("host not allowed"));
    }

    #[test]
    fn test_failure_envelope_is_valid_json_text() {
        let outcome = AnalysisResult::Failed(ErrorEnvelope::new("MISSING_INPUT", "content is required"));
        let text = serde_json::to_string_pretty(&outcome).unwrap();
        let parsed: ErrorEnvelope = serde_json::from_str(&text).unwrap();

        assert!(!parsed.success);
        assert_eq!(parsed.error.code, "MISSING_INPUT");
    }
}
