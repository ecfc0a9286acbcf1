//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::analyze_with_llm::{AnalyzeWithLlmParams, analyze_impl};
use crate::tools::parse_article::{ParseArticleParams, parse_article_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use wxmp_client::Pipeline;

/// The main MCP server handler for mcp-wechat.
///
/// The pipeline is read-only after startup and shared across concurrent calls.
#[derive(Clone)]
pub struct McpWechatServer {
    pipeline: Arc<Pipeline>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl McpWechatServer {
    /// Create a new server handler.
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline, tool_router: Self::tool_router() }
    }

    /// Parse a WeChat article and summarize it.
    #[tool(
        description = "Parse a WeChat official account article (mp.weixin.qq.com). Returns title, author, publish time, description and a detailed LLM summary. The summary is also saved as Markdown unless save_summary is false."
    )]
    async fn parse_article(&self, params: Parameters<ParseArticleParams>) -> Result<CallToolResult, McpError> {
        parse_article_impl(&self.pipeline, params.0).await
    }

    /// Deep LLM analysis of an article, saved as a Markdown report.
    #[tool(
        description = "Deep LLM analysis of a WeChat article. Provide url, or title and content. analysis_type: comprehensive (default), viewpoint or structure. Writes a Markdown report and returns its path."
    )]
    async fn analyze_with_llm(&self, params: Parameters<AnalyzeWithLlmParams>) -> Result<CallToolResult, McpError> {
        analyze_impl(&self.pipeline, params.0).await
    }
}

impl ServerHandler for McpWechatServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-wechat".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
