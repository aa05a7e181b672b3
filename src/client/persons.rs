use std::time::Duration;

use anyhow::anyhow;
use http::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::configuration::ClientConfiguration;
use crate::error::{ComposeError, ComposeResult};
use crate::observability::metrics::get_metrics;

static UPSTREAM: &str = "obsstamm";

/// Person record served by the OBS-Stamm Persons API.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub address: Option<PersonAddress>,
}

impl Person {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonAddress {
    pub street: String,
    pub postal_code: String,
    pub city: String,
    #[serde(default)]
    pub country: Option<String>,
}

/// Client for the OBS-Stamm Persons API.
///
/// The active [`ClientConfiguration`] is replaceable; the authenticated
/// factory installs one carrying the bearer token.
#[derive(Debug, Clone)]
pub struct PersonsApiClient {
    http: Client,
    configuration: ClientConfiguration,
}

impl PersonsApiClient {
    /// Client bound to `base_path` with its default configuration.
    pub fn new(base_path: impl Into<String>, http: Client) -> Self {
        let mut configuration = ClientConfiguration::for_base_path(base_path);
        configuration
            .default_headers
            .insert(ACCEPT.as_str().to_owned(), "application/json".to_owned());
        Self { http, configuration }
    }

    pub fn configuration(&self) -> &ClientConfiguration {
        &self.configuration
    }

    pub fn set_configuration(&mut self, configuration: ClientConfiguration) {
        self.configuration = configuration;
    }

    pub fn base_path(&self) -> &str {
        self.configuration.base_path()
    }

    /// `GET {base_path}/persons`
    pub async fn list_persons(&self) -> ComposeResult<Vec<Person>> {
        let metrics = get_metrics().await;
        let url = format!("{}/persons", self.base_path().trim_end_matches('/'));
        debug!(%url, "listing persons");

        let result = self.send_list_persons(&url).await;
        let outcome = if result.is_ok() { "success" } else { "error" };
        metrics.upstream_requests.with_label_values(&[UPSTREAM, outcome]).inc();
        result.inspect_err(|e| warn!("persons request failed: {}", e))
    }

    async fn send_list_persons(&self, url: &str) -> ComposeResult<Vec<Person>> {
        let configuration = &self.configuration;
        let mut request = self.http.get(url);

        for (name, value) in &configuration.default_headers {
            request = request.header(name.as_str(), value.as_str());
        }
        for name in configuration.api_key.keys() {
            if let Some(value) = configuration.api_key_with_prefix(name) {
                request = request.header(name.as_str(), value);
            }
        }
        if let Some(user_agent) = configuration.user_agent.as_deref() {
            request = request.header(USER_AGENT, user_agent);
        }
        if let Some(timeout_ms) = configuration.timeout_ms {
            request = request.timeout(Duration::from_millis(timeout_ms));
        }
        if let Some(token) = configuration.access_token() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ComposeError::Upstream(anyhow!(e).context("persons request failed")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ComposeError::Upstream(anyhow!(
                "persons API responded with {}",
                status
            )));
        }

        response
            .json::<Vec<Person>>()
            .await
            .map_err(|e| ComposeError::Upstream(anyhow!(e).context("persons response is not valid JSON")))
    }
}
