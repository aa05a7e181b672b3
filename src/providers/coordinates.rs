use std::sync::Arc;

use anyhow::anyhow;
use http::header::USER_AGENT;
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::auth::provider::{AccessTokenProvider, TokenProvider};
use crate::config::employees::{EmployeeAddress, EmployeeCoordinate, NominatimConfig};
use crate::error::{ComposeError, ComposeResult};
use crate::observability::metrics::get_metrics;
use crate::providers::addresses::AddressesProvider;
use crate::providers::{EmployeeAddressesProvider, EmployeeCoordinatesProvider};

static UPSTREAM: &str = "nominatim";

/// Coordinates listed under `Employees.Coordinates`.
#[derive(Debug, Clone)]
pub struct ConfigurationEmployeeCoordinatesProvider {
    coordinates: Arc<Vec<EmployeeCoordinate>>,
}

impl ConfigurationEmployeeCoordinatesProvider {
    pub fn new(coordinates: Vec<EmployeeCoordinate>) -> Self {
        Self {
            coordinates: Arc::new(coordinates),
        }
    }
}

impl EmployeeCoordinatesProvider for ConfigurationEmployeeCoordinatesProvider {
    async fn employee_coordinates(&self, _cancel: &CancellationToken) -> ComposeResult<Vec<EmployeeCoordinate>> {
        Ok(self.coordinates.as_ref().clone())
    }
}

/// Nominatim search hit; coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Geocodes the addresses of the registered address provider through Nominatim.
#[derive(Debug)]
pub struct NominatimEmployeeCoordinatesProvider<P = TokenProvider> {
    http: Client,
    config: Arc<NominatimConfig>,
    user_agent: String,
    addresses: Arc<AddressesProvider<P>>,
}

impl<P: AccessTokenProvider> NominatimEmployeeCoordinatesProvider<P> {
    pub fn new(
        http: Client,
        config: NominatimConfig,
        fallback_user_agent: &str,
        addresses: Arc<AddressesProvider<P>>,
    ) -> Self {
        let user_agent = config
            .user_agent
            .clone()
            .filter(|agent| !agent.trim().is_empty())
            .unwrap_or_else(|| fallback_user_agent.to_owned());
        Self {
            http,
            config: Arc::new(config),
            user_agent,
            addresses,
        }
    }

    /// First search hit for the address, `None` when Nominatim knows nothing.
    async fn geocode(&self, address: &EmployeeAddress) -> ComposeResult<Option<EmployeeCoordinate>> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let query = address.query();
        debug!(employee_id = %address.employee_id, %query, "geocoding address");

        let response = self
            .http
            .get(&url)
            .header(USER_AGENT, self.user_agent.as_str())
            .query(&[("q", query.as_str()), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| ComposeError::Upstream(anyhow!(e).context("nominatim request failed")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ComposeError::Upstream(anyhow!("nominatim responded with {}", status)));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| ComposeError::Upstream(anyhow!(e).context("nominatim response is not valid JSON")))?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let latitude = place.lat.parse::<f64>().map_err(|e| {
            ComposeError::Upstream(anyhow!("invalid latitude '{}': {}", place.lat, e))
        })?;
        let longitude = place.lon.parse::<f64>().map_err(|e| {
            ComposeError::Upstream(anyhow!("invalid longitude '{}': {}", place.lon, e))
        })?;
        debug!(display_name = ?place.display_name, latitude, longitude, "address geocoded");

        Ok(Some(EmployeeCoordinate {
            employee_id: address.employee_id.clone(),
            name: address.name.clone(),
            latitude,
            longitude,
        }))
    }
}

impl<P: AccessTokenProvider> EmployeeCoordinatesProvider for NominatimEmployeeCoordinatesProvider<P> {
    async fn employee_coordinates(&self, cancel: &CancellationToken) -> ComposeResult<Vec<EmployeeCoordinate>> {
        let metrics = get_metrics().await;
        let addresses = self.addresses.employee_addresses(cancel).await?;
        let mut coordinates = Vec::with_capacity(addresses.len());

        for address in &addresses {
            if cancel.is_cancelled() {
                return Err(ComposeError::Cancelled);
            }
            match self.geocode(address).await {
                Ok(Some(coordinate)) => {
                    metrics.upstream_requests.with_label_values(&[UPSTREAM, "success"]).inc();
                    coordinates.push(coordinate);
                }
                Ok(None) => {
                    metrics.upstream_requests.with_label_values(&[UPSTREAM, "not_found"]).inc();
                    warn!("no coordinates found for employee '{}' ({})", address.employee_id, address.query());
                }
                Err(e) => {
                    metrics.upstream_requests.with_label_values(&[UPSTREAM, "error"]).inc();
                    return Err(e);
                }
            }
        }

        info!("geocoded {} of {} addresses", coordinates.len(), addresses.len());
        Ok(coordinates)
    }
}

/// The coordinate implementation registered at startup.
#[derive(Debug)]
pub enum CoordinatesProvider<P = TokenProvider> {
    Configuration(ConfigurationEmployeeCoordinatesProvider),
    Nominatim(NominatimEmployeeCoordinatesProvider<P>),
}

impl<P> CoordinatesProvider<P> {
    pub fn name(&self) -> &'static str {
        match self {
            CoordinatesProvider::Configuration(_) => "configuration",
            CoordinatesProvider::Nominatim(_) => "nominatim",
        }
    }
}

impl<P: AccessTokenProvider> EmployeeCoordinatesProvider for CoordinatesProvider<P> {
    async fn employee_coordinates(&self, cancel: &CancellationToken) -> ComposeResult<Vec<EmployeeCoordinate>> {
        match self {
            CoordinatesProvider::Configuration(p) => p.employee_coordinates(cancel).await,
            CoordinatesProvider::Nominatim(p) => p.employee_coordinates(cancel).await,
        }
    }
}
