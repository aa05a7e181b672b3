use serde::{Deserialize, Serialize};

use crate::utils::constants::DEFAULT_NOMINATIM_URL;

/// `Employees` section: data served by the configuration-backed providers.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct EmployeesConfig {
    #[serde(default)]
    pub addresses: Vec<EmployeeAddress>,
    #[serde(default)]
    pub coordinates: Vec<EmployeeCoordinate>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct EmployeeAddress {
    pub employee_id: String,
    pub name: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl EmployeeAddress {
    /// Free-form query string, e.g. `Hauptstr. 1, 70173 Stuttgart, Germany`.
    pub fn query(&self) -> String {
        let mut query = format!("{}, {} {}", self.street.trim(), self.postal_code.trim(), self.city.trim());
        if let Some(country) = self.country.as_deref().filter(|c| !c.trim().is_empty()) {
            query.push_str(", ");
            query.push_str(country.trim());
        }
        query
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct EmployeeCoordinate {
    pub employee_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// `Nominatim` section
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct NominatimConfig {
    #[serde(default = "default_nominatim_url")]
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying agent; falls back to `Settings.Http.UserAgent`.
    pub user_agent: Option<String>,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_nominatim_url(),
            user_agent: None,
        }
    }
}

fn default_nominatim_url() -> String {
    DEFAULT_NOMINATIM_URL.to_string()
}
