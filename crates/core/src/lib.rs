//! Core types and shared functionality for mcp-wechat.
//!
//! This crate provides:
//! - Unified error types and the JSON error envelope
//! - Configuration structures
//! - Article and analysis records shared by the client and server

pub mod config;
pub mod envelope;
pub mod error;
pub mod types;

pub use config::{AppConfig, ConfigError};
pub use envelope::{ErrorBody, ErrorEnvelope};
pub use error::Error;
pub use types::{AnalysisType, ArticleMetadata, ArticleRecord, UNKNOWN};
