//! Startup composition root.
//!
//! Owns one implementation per capability and the deferred factory for the
//! authenticated Persons API client. Composition performs no network I/O and
//! resolves no endpoint, so an unreachable authentication service or an
//! unusable OBS-Stamm URL only affects consumers of the client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::auth::provider::{AccessTokenProvider, TokenProvider};
use crate::client::factory::PersonsClientFactory;
use crate::client::persons::PersonsApiClient;
use crate::config::settings::HttpConfig;
use crate::config::types::AppConfig;
use crate::error::{ComposeError, ComposeResult};
use crate::observability::metrics::get_metrics;
use crate::providers::selector::{select_address_provider, select_coordinate_provider, ProviderContext};
use crate::providers::{
    AddressesProvider, ConfigurationCirclesPropertyProvider, ConfigurationCompanyInformationProvider,
    CoordinatesProvider, EmployeeCirclesInformationProvider,
};

pub struct Registry<P = TokenProvider> {
    persons_clients: Arc<PersonsClientFactory<P>>,
    addresses: Arc<AddressesProvider<P>>,
    coordinates: Arc<CoordinatesProvider<P>>,
    company: Arc<ConfigurationCompanyInformationProvider>,
    circle_properties: Arc<ConfigurationCirclesPropertyProvider>,
    circles: EmployeeCirclesInformationProvider<P>,
}

/// Shared outbound client; timeouts live here, not in the core.
pub fn build_http_client(http: &HttpConfig) -> ComposeResult<Client> {
    Client::builder()
        .timeout(Duration::from_millis(http.timeout_ms()))
        .user_agent(http.user_agent())
        .build()
        .map_err(|e| ComposeError::configuration(format!("cannot build http client: {}", e)))
}

impl Registry<TokenProvider> {
    /// Compose with the OAuth2 authentication service described by `Authentication`.
    pub async fn compose(config: &AppConfig) -> ComposeResult<Self> {
        let http = build_http_client(&config.settings.http)?;
        let token_provider = TokenProvider::from_config(
            &config.authentication,
            config.settings.retry.as_ref(),
            http.clone(),
        );
        Self::compose_with(config, http, token_provider).await
    }
}

impl<P: AccessTokenProvider> Registry<P> {
    pub async fn compose_with(config: &AppConfig, http: Client, token_provider: P) -> ComposeResult<Self> {
        let metrics = get_metrics().await;
        let persons_clients = Arc::new(PersonsClientFactory::new(
            config.services.clone(),
            http.clone(),
            Arc::new(token_provider),
        ));

        let ctx = ProviderContext {
            http: &http,
            user_agent: config.settings.http.user_agent(),
            employees: &config.employees,
            nominatim: &config.nominatim,
            persons_clients: &persons_clients,
            metrics,
        };

        let addresses = Arc::new(select_address_provider(&config.employee_addresses_source(), &ctx));
        let coordinates = Arc::new(select_coordinate_provider(
            &config.coordinate_source(),
            &ctx,
            Arc::clone(&addresses),
        ));

        // single implementation each, always registered
        let company = Arc::new(ConfigurationCompanyInformationProvider::new(config.company.clone()));
        let circle_properties = Arc::new(ConfigurationCirclesPropertyProvider::new(config.circles.clone()));
        let circles = EmployeeCirclesInformationProvider::new(
            Arc::clone(&company),
            Arc::clone(&circle_properties),
            Arc::clone(&coordinates),
        );

        info!(
            addresses = addresses.name(),
            coordinates = coordinates.name(),
            company_configured = company.is_configured(),
            circles = config.circles.len(),
            "registry composed"
        );

        Ok(Self {
            persons_clients,
            addresses,
            coordinates,
            company,
            circle_properties,
            circles,
        })
    }

    pub fn addresses(&self) -> &AddressesProvider<P> {
        &self.addresses
    }

    pub fn coordinates(&self) -> &CoordinatesProvider<P> {
        &self.coordinates
    }

    pub fn company(&self) -> &ConfigurationCompanyInformationProvider {
        &self.company
    }

    pub fn circle_properties(&self) -> &ConfigurationCirclesPropertyProvider {
        &self.circle_properties
    }

    pub fn circles(&self) -> &EmployeeCirclesInformationProvider<P> {
        &self.circles
    }

    pub fn persons_client_factory(&self) -> &Arc<PersonsClientFactory<P>> {
        &self.persons_clients
    }

    /// Resolve a fresh authenticated Persons API client.
    pub async fn persons_client(&self, cancel: &CancellationToken) -> ComposeResult<PersonsApiClient> {
        self.persons_clients.create(cancel).await
    }
}
