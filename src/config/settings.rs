use serde::Deserialize;

use crate::utils::constants::{
    DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_BASE_DELAY_MS,
    DEFAULT_RETRY_MAX_DELAY_MS, DEFAULT_USER_AGENT,
};

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct SettingsConfig {
    pub logging: Option<LoggingConfig>,
    /// Wraps the authentication service with backoff when present.
    pub retry: Option<RetryConfig>,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct RetryConfig {
    pub attempts: Option<u32>,
    /// will be mutiply by 2 on every attempt until max_delay_ms
    pub base_delay_ms: Option<u64>,
    /// invariant: >= base_delay_ms
    pub max_delay_ms: Option<u64>,
}

impl RetryConfig {
    pub fn attempts(&self) -> u32 {
        self.attempts.unwrap_or(DEFAULT_RETRY_ATTEMPTS)
    }

    pub fn base_delay_ms(&self) -> u64 {
        self.base_delay_ms.unwrap_or(DEFAULT_RETRY_BASE_DELAY_MS)
    }

    pub fn max_delay_ms(&self) -> u64 {
        self.max_delay_ms.unwrap_or(DEFAULT_RETRY_MAX_DELAY_MS)
    }
}

/// Outbound HTTP client settings shared by every upstream call.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct HttpConfig {
    pub timeout_ms: Option<u64>,
    pub user_agent: Option<String>,
}

impl HttpConfig {
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_HTTP_TIMEOUT_MS)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent
            .as_deref()
            .filter(|agent| !agent.trim().is_empty())
            .unwrap_or(DEFAULT_USER_AGENT)
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
