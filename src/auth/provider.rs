use std::future::Future;
use std::sync::Arc;

use anyhow::anyhow;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::auth::token::AccessToken;
use crate::config::authentication::{AuthenticationConfiguration, ClientAuthentication};
use crate::config::settings::RetryConfig;
use crate::error::{ComposeError, ComposeResult};
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;
use crate::parser::token_response::parse_token_response;
use crate::resilience::retry::{RetrySettings, RetryingTokenProvider};
use crate::utils::constants::CLIENT_CREDENTIALS_GRANT;

/// Anything that can hand out a bearer token for outbound API clients.
///
/// Implementations must not block: the call is awaited by the client factory
/// and may be cancelled through `cancel`.
pub trait AccessTokenProvider: Send + Sync {
    fn get_access_token(
        &self,
        cancel: &CancellationToken,
    ) -> impl Future<Output = ComposeResult<AccessToken>> + Send;
}

/// OAuth2 client-credentials against the configured authentication service.
/// Every call is a fresh round trip: no caching, no retries.
#[derive(Debug, Clone)]
pub struct AuthenticationService {
    config: Arc<AuthenticationConfiguration>,
    client: Client,
}

impl AuthenticationService {
    pub fn new(config: AuthenticationConfiguration, client: Client) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }

    async fn request_token(&self) -> ComposeResult<AccessToken> {
        if self.config.token_url.trim().is_empty() {
            return Err(ComposeError::configuration("Authentication.TokenUrl is not configured"));
        }
        let client_id = self.config.client_id.resolve()?;
        let client_secret = self.config.client_secret.resolve()?;

        let mut form: Vec<(&str, String)> = vec![("grant_type", CLIENT_CREDENTIALS_GRANT.to_owned())];
        if let Some(scope) = self.config.scope.as_ref().filter(|s| !s.trim().is_empty()) {
            form.push(("scope", scope.to_owned()));
        }
        if let Some(audience) = self.config.audience.as_ref().filter(|a| !a.trim().is_empty()) {
            form.push(("audience", audience.to_owned()));
        }

        let mut request = self.client.post(&self.config.token_url);
        match self.config.client_authentication {
            ClientAuthentication::Post => {
                form.push(("client_id", client_id));
                form.push(("client_secret", client_secret));
            }
            ClientAuthentication::Basic => {
                request = request.basic_auth(client_id, Some(client_secret));
            }
        }

        let response = request
            .form(&form)
            .send()
            .await
            .map_err(|e| ComposeError::Authentication(anyhow!(e).context("token request failed")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ComposeError::Authentication(anyhow!(
                "authentication service responded with {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ComposeError::Authentication(anyhow!(e).context("token response body unreadable")))?;

        parse_token_response(&body).map_err(ComposeError::Authentication)
    }
}

impl AccessTokenProvider for AuthenticationService {
    async fn get_access_token(&self, cancel: &CancellationToken) -> ComposeResult<AccessToken> {
        let metrics = get_metrics().await;
        let start = get_instant();
        metrics.token_fetch_requests.inc();
        debug!(token_url = %self.config.token_url, "requesting access token");

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ComposeError::Cancelled),
            result = self.request_token() => result,
        };

        metrics.token_fetch_duration.observe(start.elapsed().as_secs_f64());
        match &result {
            Ok(token) if token.is_expired() => {
                warn!(expires_at = ?token.expires_at(), "authentication service issued an already expired token")
            }
            Ok(token) => info!(expires_at = ?token.expires_at(), "access token obtained"),
            Err(err) => {
                let reason = match err {
                    ComposeError::Cancelled => "cancelled",
                    ComposeError::Configuration(_) => "configuration",
                    _ => "authentication",
                };
                metrics.token_fetch_failures.with_label_values(&[reason]).inc();
                warn!("access token request failed: {}", err);
            }
        }
        result
    }
}

/// The token provider registered at startup, with or without backoff.
#[derive(Debug, Clone)]
pub enum TokenProvider {
    Direct(AuthenticationService),
    Retrying(RetryingTokenProvider<AuthenticationService>),
}

impl TokenProvider {
    pub fn from_config(
        auth: &AuthenticationConfiguration,
        retry: Option<&RetryConfig>,
        client: Client,
    ) -> Self {
        let service = AuthenticationService::new(auth.clone(), client);
        match retry {
            Some(retry) => {
                let settings = RetrySettings::from_config(retry);
                info!("authentication service wrapped with retry: {:?}", settings);
                TokenProvider::Retrying(RetryingTokenProvider::new(service, settings))
            }
            None => TokenProvider::Direct(service),
        }
    }
}

impl AccessTokenProvider for TokenProvider {
    async fn get_access_token(&self, cancel: &CancellationToken) -> ComposeResult<AccessToken> {
        match self {
            TokenProvider::Direct(p) => p.get_access_token(cancel).await,
            TokenProvider::Retrying(p) => p.get_access_token(cancel).await,
        }
    }
}
