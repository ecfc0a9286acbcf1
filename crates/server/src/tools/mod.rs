//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-wechat server.

pub mod analyze_with_llm;
pub mod parse_article;

pub use analyze_with_llm::AnalyzeWithLlmParams;
pub use parse_article::ParseArticleParams;
