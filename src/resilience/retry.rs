use std::future::Future;

use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::auth::provider::AccessTokenProvider;
use crate::auth::token::AccessToken;
use crate::config::settings::RetryConfig;
use crate::error::{ComposeError, ComposeResult};

#[derive(Debug, Clone)]
pub struct RetrySettings {
    pub attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetrySettings {
    pub fn from_config(retry: &RetryConfig) -> Self {
        Self {
            attempts: retry.attempts().max(1),
            base_delay_ms: retry.base_delay_ms(),
            max_delay_ms: retry.max_delay_ms(),
        }
    }

    /// Doubled delay, capped at `max_delay_ms`.
    fn next_delay(&self, delay: u64) -> u64 {
        delay.saturating_mul(2).min(self.max_delay_ms)
    }

    /// Retry authentication failures with exponential backoff.
    /// Configuration errors and cancellation end the loop immediately.
    pub async fn run_with_retry<F, Fut, T>(
        &self,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> ComposeResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ComposeResult<T>>,
    {
        let attempts = self.attempts.max(1);
        let mut delay = self.base_delay_ms;
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e @ ComposeError::Authentication(_)) if attempt < attempts => {
                    warn!("Attempt {attempt}/{attempts} failed: {e}");
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(ComposeError::Cancelled),
                        _ = sleep(Duration::from_millis(delay)) => {}
                    }
                    delay = self.next_delay(delay);
                    attempt += 1;
                }
                Err(e) => {
                    error!("giving up after {attempt} attempt(s): {e}");
                    return Err(e);
                }
            }
        }
    }
}

/// Decorator adding backoff around any token provider; the wrapped provider stays retry-free.
#[derive(Debug, Clone)]
pub struct RetryingTokenProvider<P> {
    inner: P,
    settings: RetrySettings,
}

impl<P> RetryingTokenProvider<P> {
    pub fn new(inner: P, settings: RetrySettings) -> Self {
        Self { inner, settings }
    }
}

impl<P: AccessTokenProvider> AccessTokenProvider for RetryingTokenProvider<P> {
    async fn get_access_token(&self, cancel: &CancellationToken) -> ComposeResult<AccessToken> {
        self.settings
            .run_with_retry(cancel, || self.inner.get_access_token(cancel))
            .await
    }
}
