//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. `ZHIPU_API_KEY` for the LLM credential
//! 2. Environment variables (MCP_WECHAT_*)
//! 3. TOML config file (if MCP_WECHAT_CONFIG_FILE set)
//! 4. Built-in defaults

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Desktop Chrome User-Agent; the article host serves a reduced page to unknown agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. `ZHIPU_API_KEY`
/// 2. Environment variables (MCP_WECHAT_*)
/// 3. TOML config file (if MCP_WECHAT_CONFIG_FILE set)
/// 4. Built-in defaults
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Zhipu AI API key for the LLM-backed tools.
    ///
    /// Set via ZHIPU_API_KEY environment variable.
    /// Required only when an LLM call is made.
    #[serde(default)]
    pub zhipu_api_key: Option<String>,

    /// Base URL of the chat-completions API.
    ///
    /// Set via MCP_WECHAT_LLM_BASE_URL environment variable.
    #[serde(default = "default_llm_base_url")]
    pub llm_base_url: String,

    /// Model used when a tool call does not name one.
    ///
    /// Set via MCP_WECHAT_DEFAULT_MODEL environment variable.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// LLM request timeout in milliseconds.
    ///
    /// Set via MCP_WECHAT_LLM_TIMEOUT_MS environment variable.
    #[serde(default = "default_llm_timeout_ms")]
    pub llm_timeout_ms: u64,

    /// User-Agent string for article requests.
    ///
    /// Set via MCP_WECHAT_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Article fetch timeout in milliseconds.
    ///
    /// Set via MCP_WECHAT_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes to fetch per article.
    ///
    /// Set via MCP_WECHAT_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Hostnames article URLs may point at.
    ///
    /// Set via MCP_WECHAT_ALLOWED_HOSTS environment variable (e.g. `[mp.weixin.qq.com]`).
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,

    /// Directory for reports written without an explicit path.
    ///
    /// Set via MCP_WECHAT_OUTPUT_DIR environment variable.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Character cap on article text embedded in the summary prompt.
    #[serde(default = "default_summary_input_chars")]
    pub summary_input_chars: usize,

    /// Character cap on article text embedded in analysis prompts.
    #[serde(default = "default_analysis_input_chars")]
    pub analysis_input_chars: usize,
}

fn default_llm_base_url() -> String {
    "https://open.bigmodel.cn/api/paas/v4".into()
}

fn default_model() -> String {
    "glm-4".into()
}

fn default_llm_timeout_ms() -> u64 {
    120_000
}

fn default_user_agent() -> String {
    BROWSER_USER_AGENT.into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_allowed_hosts() -> Vec<String> {
    vec!["mp.weixin.qq.com".into(), "weixin.qq.com".into()]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_summary_input_chars() -> usize {
    4_000
}

fn default_analysis_input_chars() -> usize {
    6_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            zhipu_api_key: None,
            llm_base_url: default_llm_base_url(),
            default_model: default_model(),
            llm_timeout_ms: default_llm_timeout_ms(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            allowed_hosts: default_allowed_hosts(),
            output_dir: default_output_dir(),
            summary_input_chars: default_summary_input_chars(),
            analysis_input_chars: default_analysis_input_chars(),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("zhipu_api_key", &self.zhipu_api_key.as_deref().map(|_| "<redacted>"))
            .field("llm_base_url", &self.llm_base_url)
            .field("default_model", &self.default_model)
            .field("llm_timeout_ms", &self.llm_timeout_ms)
            .field("user_agent", &self.user_agent)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_bytes", &self.max_bytes)
            .field("allowed_hosts", &self.allowed_hosts)
            .field("output_dir", &self.output_dir)
            .field("summary_input_chars", &self.summary_input_chars)
            .field("analysis_input_chars", &self.analysis_input_chars)
            .finish()
    }
}

impl AppConfig {
    /// Fetch timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// LLM timeout as Duration for use with reqwest.
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_millis(self.llm_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. `ZHIPU_API_KEY`
    /// 2. Environment variables prefixed with `MCP_WECHAT_`
    /// 3. TOML file from `MCP_WECHAT_CONFIG_FILE` (if set)
    /// 4. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MCP_WECHAT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment
            .merge(
                Env::prefixed("MCP_WECHAT_")
                    .ignore(&["CONFIG_FILE"])
                    .map(|key| key.as_str().to_lowercase().into())
                    .split("__"),
            )
            .merge(Env::raw().only(&["ZHIPU_API_KEY"]));

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the Zhipu API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set or blank.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.zhipu_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "zhipu_api_key".into(),
                hint: "Set ZHIPU_API_KEY environment variable in the MCP server configuration".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.zhipu_api_key.is_none());
        assert_eq!(config.llm_base_url, "https://open.bigmodel.cn/api/paas/v4");
        assert_eq!(config.default_model, "glm-4");
        assert_eq!(config.llm_timeout_ms, 120_000);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.max_bytes, 5_242_880);
        assert_eq!(config.allowed_hosts, vec!["mp.weixin.qq.com", "weixin.qq.com"]);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.summary_input_chars, 4_000);
        assert_eq!(config.analysis_input_chars, 6_000);
    }

    #[test]
    fn test_timeout_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
        assert_eq!(config.llm_timeout(), Duration::from_millis(120_000));
    }

    #[test]
    fn test_require_api_key_missing() {
        let config = AppConfig::default();
        let result = config.require_api_key();
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_api_key_blank() {
        let config = AppConfig { zhipu_api_key: Some("   ".into()), ..Default::default() };
        assert!(matches!(config.require_api_key(), Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_api_key_present() {
        let config = AppConfig { zhipu_api_key: Some("test-key".into()), ..Default::default() };
        let result = config.require_api_key();
        assert_eq!(result.unwrap(), "test-key");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AppConfig { zhipu_api_key: Some("secret-key".into()), ..Default::default() };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_load_reads_api_key_and_prefixed_vars() {
        Jail::expect_with(|jail| {
            jail.set_env("ZHIPU_API_KEY", "from-env");
            jail.set_env("MCP_WECHAT_DEFAULT_MODEL", "glm-4-flash");
            jail.set_env("MCP_WECHAT_TIMEOUT_MS", "15000");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.zhipu_api_key.as_deref(), Some("from-env"));
            assert_eq!(config.default_model, "glm-4-flash");
            assert_eq!(config.timeout_ms, 15_000);
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "wechat.toml",
                r#"
                    output_dir = "reports"
                    allowed_hosts = ["mp.weixin.qq.com"]
                "#,
            )?;
            jail.set_env("MCP_WECHAT_CONFIG_FILE", "wechat.toml");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.output_dir, PathBuf::from("reports"));
            assert_eq!(config.allowed_hosts, vec!["mp.weixin.qq.com"]);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        Jail::expect_with(|jail| {
            jail.set_env("MCP_WECHAT_TIMEOUT_MS", "5");
            let result = AppConfig::load();
            assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
            Ok(())
        });
    }
}
