// tests/common/mod.rs
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::anyhow;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::auth::provider::AccessTokenProvider;
use crate::auth::token::AccessToken;
use crate::config::proc_loader::parse_config;
use crate::config::types::AppConfig;
use crate::error::{ComposeError, ComposeResult};

/// Token provider stub: a fixed token, or a network-style failure.
pub struct StaticTokenProvider {
    token: Option<String>,
    calls: AtomicUsize,
}

impl StaticTokenProvider {
    pub fn returning(token: &str) -> Self {
        Self { token: Some(token.to_owned()), calls: AtomicUsize::new(0) }
    }

    pub fn failing() -> Self {
        Self { token: None, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AccessTokenProvider for StaticTokenProvider {
    async fn get_access_token(&self, cancel: &CancellationToken) -> ComposeResult<AccessToken> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if cancel.is_cancelled() {
            return Err(ComposeError::Cancelled);
        }
        match &self.token {
            Some(token) => Ok(AccessToken::new(token.as_str())),
            None => Err(ComposeError::Authentication(anyhow!("connection refused (os error 111)"))),
        }
    }
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Minimal valid configuration; `extra` is appended verbatim as top-level YAML.
pub fn config_yaml(stamm_url: &str, template: &str, token_url: &str, extra: &str) -> String {
    format!(
        r#"
Settings:
  Logging:
    Level: debug
    Format: compact
Services:
  StammServiceUrl: "{stamm_url}"
  ServiceTemplateUrl: "{template}"
Authentication:
  TokenUrl: "{token_url}"
  ClientId: dashboard
  ClientSecret:
    Value: s3cr3t
  Scope: persons.read
{extra}
"#
    )
}

pub async fn load_config(yaml: String) -> AppConfig {
    parse_config(yaml).await.expect("test config must be valid")
}
