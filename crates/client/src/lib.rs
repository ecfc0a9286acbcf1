//! Client code for mcp-wechat.
//!
//! This crate provides the article fetch pipeline, field extraction, the
//! Zhipu chat-completion client and report rendering used by the server.

pub mod extract;
pub mod fetch;
pub mod llm;
pub mod pipeline;
pub mod render;

pub use extract::{Extractor, WechatExtractor, extract_article};
pub use fetch::{FetchClient, FetchConfig, RawPage};
pub use llm::{LlmConfig, Summarizer};
pub use pipeline::{AnalysisRequest, AnalysisResult, ParseResult, Pipeline};
