//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` or `llm_timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent`, `llm_base_url` or `default_model` is empty
    /// - `allowed_hosts` is empty
    /// - either prompt character cap is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        for (field, value) in [("timeout_ms", self.timeout_ms), ("llm_timeout_ms", self.llm_timeout_ms)] {
            if value < 100 {
                return Err(invalid(field, "must be at least 100ms"));
            }
            if value > 300_000 {
                return Err(invalid(field, "must not exceed 5 minutes (300000ms)"));
            }
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }
        if self.llm_base_url.trim().is_empty() {
            return Err(invalid("llm_base_url", "must not be empty"));
        }
        if self.default_model.trim().is_empty() {
            return Err(invalid("default_model", "must not be empty"));
        }

        if self.allowed_hosts.iter().all(|h| h.trim().is_empty()) {
            return Err(invalid("allowed_hosts", "must name at least one host"));
        }

        if self.summary_input_chars == 0 {
            return Err(invalid("summary_input_chars", "must be greater than 0"));
        }
        if self.analysis_input_chars == 0 {
            return Err(invalid("analysis_input_chars", "must be greater than 0"));
        }

        if self.zhipu_api_key.is_none() {
            tracing::warn!("ZHIPU_API_KEY is not set; LLM-backed tools will return LLM_CONFIG_ERROR");
        }

        Ok(())
    }
}
