use serde::Deserialize;

use crate::config::authentication::AuthenticationConfiguration;
use crate::config::circles::CircleProperty;
use crate::config::company::CompanyInformation;
use crate::config::employees::{EmployeesConfig, NominatimConfig};
use crate::config::services::ServicesConfiguration;
use crate::config::settings::SettingsConfig;
use crate::config::sources::{CoordinateSource, EmployeeAddressesSource};

/// ================================
/// Full application configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct AppConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub services: ServicesConfiguration,
    #[serde(default)]
    pub authentication: AuthenticationConfiguration,
    /// absent behaves as `Configuration`
    pub coordinate_source: Option<CoordinateSource>,
    /// absent behaves as `Configuration`
    pub employee_addresses_source: Option<EmployeeAddressesSource>,
    #[serde(default)]
    pub nominatim: NominatimConfig,
    #[serde(default)]
    pub employees: EmployeesConfig,
    pub company: Option<CompanyInformation>,
    #[serde(default)]
    pub circles: Vec<CircleProperty>,
}

impl AppConfig {
    pub fn coordinate_source(&self) -> CoordinateSource {
        self.coordinate_source.clone().unwrap_or_default()
    }

    pub fn employee_addresses_source(&self) -> EmployeeAddressesSource {
        self.employee_addresses_source.clone().unwrap_or_default()
    }
}
