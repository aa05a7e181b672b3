use std::sync::Arc;

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::auth::provider::{AccessTokenProvider, TokenProvider};
use crate::client::configuration::ClientConfiguration;
use crate::client::persons::PersonsApiClient;
use crate::config::services::ServicesConfiguration;
use crate::error::ComposeResult;
use crate::observability::metrics::get_metrics;
use crate::resolver::url::resolve_services;
use crate::utils::constants::OBS_STAMM_SERVICE_ID;

/// Build an authenticated Persons API client.
///
/// 1. resolve the OBS-Stamm endpoint (explicit URL, else template)
/// 2. bind a client with its default configuration to it
/// 3. await an access token (cancellable; failures propagate)
/// 4. lay a token-only configuration over the client's own one
///
/// Either a fully configured client comes back or an error does.
pub async fn build_persons_client<P: AccessTokenProvider>(
    services: &ServicesConfiguration,
    http: &Client,
    token_provider: &P,
    cancel: &CancellationToken,
) -> ComposeResult<PersonsApiClient> {
    let url = resolve_services(services, OBS_STAMM_SERVICE_ID)?;
    let mut client = PersonsApiClient::new(url, http.clone());

    let token = token_provider.get_access_token(cancel).await?;

    let credential = ClientConfiguration::with_access_token(&token);
    let merged = ClientConfiguration::merge(&credential, client.configuration());
    client.set_configuration(merged);

    debug!(base_path = client.base_path(), "persons client configured");
    Ok(client)
}

/// Deferred, transient registration of [`PersonsApiClient`]: every `create`
/// runs the whole pipeline and hands the caller its own client. An unusable
/// endpoint only fails `create`, never the registration.
#[derive(Debug)]
pub struct PersonsClientFactory<P = TokenProvider> {
    services: Arc<ServicesConfiguration>,
    http: Client,
    token_provider: Arc<P>,
}

impl<P: AccessTokenProvider> PersonsClientFactory<P> {
    /// Registration only; the endpoint is resolved and a token requested on every `create`.
    pub fn new(services: ServicesConfiguration, http: Client, token_provider: Arc<P>) -> Self {
        info!("persons client factory registered for service '{}'", OBS_STAMM_SERVICE_ID);
        Self {
            services: Arc::new(services),
            http,
            token_provider,
        }
    }

    pub async fn create(&self, cancel: &CancellationToken) -> ComposeResult<PersonsApiClient> {
        let client = build_persons_client(&self.services, &self.http, self.token_provider.as_ref(), cancel).await?;
        get_metrics().await.persons_clients_created.inc();
        Ok(client)
    }
}
