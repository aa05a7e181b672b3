//! Composition error taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    /// Missing or invalid configuration (URL, template, secret reference, validation).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Token acquisition against the authentication service failed.
    #[error("authentication error: {0:#}")]
    Authentication(#[source] anyhow::Error),

    /// Token acquisition was cancelled before it completed.
    #[error("token acquisition cancelled")]
    Cancelled,

    /// A data call to an upstream system (Persons API, Nominatim) failed.
    #[error("upstream error: {0:#}")]
    Upstream(#[source] anyhow::Error),
}

impl ComposeError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ComposeError::Configuration(message.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ComposeError::Cancelled)
    }
}

pub type ComposeResult<T> = std::result::Result<T, ComposeError>;
