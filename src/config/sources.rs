use serde::Deserialize;
use std::fmt;

/// ================================
/// Provider source selectors
/// ================================
///
/// Both selectors are read from plain strings and matched case-insensitively.
/// Anything outside the known names is kept as `Unrecognized` so the selector
/// can fall back explicitly instead of failing deserialization.

/// `CoordinateSource`: where employee coordinates come from.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(from = "String")]
pub enum CoordinateSource {
    /// `Employees.Coordinates` in the configuration file
    #[default]
    Configuration,
    /// geocode employee addresses through Nominatim
    Nominatim,
    Unrecognized(String),
}

impl From<String> for CoordinateSource {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "configuration" => CoordinateSource::Configuration,
            "nominatim" => CoordinateSource::Nominatim,
            _ => CoordinateSource::Unrecognized(value),
        }
    }
}

impl fmt::Display for CoordinateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateSource::Configuration => f.write_str("Configuration"),
            CoordinateSource::Nominatim => f.write_str("Nominatim"),
            CoordinateSource::Unrecognized(value) => write!(f, "Unrecognized({})", value),
        }
    }
}

/// `EmployeeAddressesSource`: where employee addresses come from.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(from = "String")]
pub enum EmployeeAddressesSource {
    /// `Employees.Addresses` in the configuration file
    #[default]
    Configuration,
    /// persons read from the OBS-Stamm system
    ObsStamm,
    Unrecognized(String),
}

impl From<String> for EmployeeAddressesSource {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "configuration" => EmployeeAddressesSource::Configuration,
            "obsstamm" => EmployeeAddressesSource::ObsStamm,
            _ => EmployeeAddressesSource::Unrecognized(value),
        }
    }
}

impl fmt::Display for EmployeeAddressesSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmployeeAddressesSource::Configuration => f.write_str("Configuration"),
            EmployeeAddressesSource::ObsStamm => f.write_str("ObsStamm"),
            EmployeeAddressesSource::Unrecognized(value) => write!(f, "Unrecognized({})", value),
        }
    }
}
