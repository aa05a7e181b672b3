use std::sync::Arc;

use reqwest::Client;
use tracing::{info, warn};

use crate::auth::provider::{AccessTokenProvider, TokenProvider};
use crate::client::factory::PersonsClientFactory;
use crate::config::employees::{EmployeesConfig, NominatimConfig};
use crate::config::sources::{CoordinateSource, EmployeeAddressesSource};
use crate::observability::metrics::Metrics;
use crate::providers::addresses::{
    AddressesProvider, ConfigurationEmployeeAddressesProvider, ObsStammEmployeeAddressesProvider,
};
use crate::providers::coordinates::{
    ConfigurationEmployeeCoordinatesProvider, CoordinatesProvider, NominatimEmployeeCoordinatesProvider,
};

/// Everything an implementation may need at construction time.
pub struct ProviderContext<'a, P = TokenProvider> {
    pub http: &'a Client,
    pub user_agent: &'a str,
    pub employees: &'a EmployeesConfig,
    pub nominatim: &'a NominatimConfig,
    pub persons_clients: &'a Arc<PersonsClientFactory<P>>,
    pub metrics: &'a Metrics,
}

/// `Nominatim` geocodes; `Configuration`, unset and unrecognized values read the configuration.
pub fn select_coordinate_provider<P: AccessTokenProvider>(
    source: &CoordinateSource,
    ctx: &ProviderContext<'_, P>,
    addresses: Arc<AddressesProvider<P>>,
) -> CoordinatesProvider<P> {
    let provider = match source {
        CoordinateSource::Nominatim => CoordinatesProvider::Nominatim(NominatimEmployeeCoordinatesProvider::new(
            ctx.http.clone(),
            ctx.nominatim.clone(),
            ctx.user_agent,
            addresses,
        )),
        CoordinateSource::Configuration => CoordinatesProvider::Configuration(
            ConfigurationEmployeeCoordinatesProvider::new(ctx.employees.coordinates.clone()),
        ),
        // unknown values keep the configuration-backed default instead of failing startup
        CoordinateSource::Unrecognized(value) => {
            warn!("CoordinateSource '{}' not recognized, falling back to configuration", value);
            CoordinatesProvider::Configuration(ConfigurationEmployeeCoordinatesProvider::new(
                ctx.employees.coordinates.clone(),
            ))
        }
    };

    info!("coordinates provider: {} (CoordinateSource = {})", provider.name(), source);
    ctx.metrics
        .provider_selections
        .with_label_values(&["coordinates", provider.name()])
        .inc();
    provider
}

/// `ObsStamm` reads OBS-Stamm persons; `Configuration`, unset and unrecognized values read the configuration.
pub fn select_address_provider<P: AccessTokenProvider>(
    source: &EmployeeAddressesSource,
    ctx: &ProviderContext<'_, P>,
) -> AddressesProvider<P> {
    let provider = match source {
        EmployeeAddressesSource::ObsStamm => AddressesProvider::ObsStamm(ObsStammEmployeeAddressesProvider::new(
            Arc::clone(ctx.persons_clients),
        )),
        EmployeeAddressesSource::Configuration => AddressesProvider::Configuration(
            ConfigurationEmployeeAddressesProvider::new(ctx.employees.addresses.clone()),
        ),
        // unknown values keep the configuration-backed default instead of failing startup
        EmployeeAddressesSource::Unrecognized(value) => {
            warn!("EmployeeAddressesSource '{}' not recognized, falling back to configuration", value);
            AddressesProvider::Configuration(ConfigurationEmployeeAddressesProvider::new(
                ctx.employees.addresses.clone(),
            ))
        }
    };

    info!("addresses provider: {} (EmployeeAddressesSource = {})", provider.name(), source);
    ctx.metrics
        .provider_selections
        .with_label_values(&["addresses", provider.name()])
        .inc();
    provider
}
