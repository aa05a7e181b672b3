//! # Dashboard Composer
//!
//! Startup composition for the dashboard map: picks the data-provider
//! implementation for each capability from configuration and provisions the
//! OAuth2-authenticated OBS-Stamm Persons API client.
//!
//! Modules:
//! - `config`: YAML configuration, env expansion and validation
//! - `resolver`: service endpoint resolution (explicit url or template)
//! - `auth`: access token providers
//! - `client`: client configuration merge, Persons API client and its factory
//! - `providers`: capability interfaces, implementations and the selector
//! - `registry`: the composition root tying everything together

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod helpers;
pub mod observability;
pub mod parser;
pub mod providers;
pub mod registry;
pub mod resilience;
pub mod resolver;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::config::types::AppConfig;
pub use crate::error::{ComposeError, ComposeResult};
pub use crate::registry::Registry;
