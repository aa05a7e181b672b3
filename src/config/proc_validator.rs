//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Checks the invariants composition depends on:
//!   * a usable OBS-Stamm endpoint (explicit URL or `{service}` template),
//!     an absolute token endpoint and non-empty client credentials, all only
//!     when OBS-Stamm addresses are selected
//!   * logging / retry / http settings
//!   * Nominatim endpoint when geocoding is selected
//!   * configuration-backed employee data (unique ids, coordinate ranges)
//!   * company location and distance circles

use std::collections::HashSet;

use reqwest::Url;
use tracing::{debug, error, info, warn};

use crate::config::authentication::AuthenticationConfiguration;
use crate::config::circles::CircleProperty;
use crate::config::company::CompanyInformation;
use crate::config::employees::EmployeesConfig;
use crate::config::services::ServicesConfiguration;
use crate::config::settings::{RetryConfig, SettingsConfig};
use crate::config::sources::{CoordinateSource, EmployeeAddressesSource};
use crate::config::types::AppConfig;
use crate::observability::metrics::get_metrics;
use crate::parser::template::{contains_placeholder, SERVICE_PLACEHOLDER};

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_app_config(cfg: &AppConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    // the Persons client is only built for OBS-Stamm addresses
    if cfg.employee_addresses_source() == EmployeeAddressesSource::ObsStamm {
        validate_services(&cfg.services, &mut errors);
        validate_authentication(&cfg.authentication, &mut errors);
    } else {
        debug!("Services / Authentication not validated: OBS-Stamm addresses are not selected");
    }
    validate_sources(cfg, &mut errors);
    validate_employees(&cfg.employees, &mut errors);
    if let Some(company) = &cfg.company {
        validate_company(company, &mut errors);
    }
    validate_circles(&cfg.circles, &mut errors);

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        get_metrics().await.config_validation_errors.inc_by(errors.len() as u64);
        Err(errors)
    }
}

/// SETTINGS VALIDATION
fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if let Some(retry) = &settings.retry {
        validate_retry("Settings.Retry", retry, errors);
    }

    if let Some(logging) = &settings.logging {
        let valid = ["trace", "debug", "info", "warn", "error"];
        if !valid.contains(&logging.level.to_ascii_lowercase().as_str()) {
            errors.push(format!(
                "Settings.Logging.Level '{}' invalid; allowed: {:?}",
                logging.level, valid
            ));
        }
    }

    if settings.http.timeout_ms == Some(0) {
        errors.push("Settings.Http.TimeoutMs must be > 0".to_string());
    }
}

fn validate_retry(path: &str, retry: &RetryConfig, errors: &mut Vec<String>) {
    if let Some(attempts) = retry.attempts {
        if attempts == 0 {
            errors.push(format!("{}.Attempts must be > 0", path));
        }
    }
    if let (Some(base), Some(max)) = (retry.base_delay_ms, retry.max_delay_ms) {
        if max < base {
            errors.push(format!(
                "{}.MaxDelayMs ({}) must be >= BaseDelayMs ({})",
                path, max, base
            ));
        }
    }
}

/// SERVICES VALIDATION
fn validate_services(services: &ServicesConfiguration, errors: &mut Vec<String>) {
    let explicit = services
        .stamm_service_url
        .as_deref()
        .filter(|url| !url.trim().is_empty());

    // explicit url wins regardless of the template
    if explicit.is_some() {
        return;
    }

    let template = services.service_template_url.trim();
    if template.is_empty() {
        errors.push(
            "Services: either StammServiceUrl or ServiceTemplateUrl must be provided".to_string(),
        );
    } else if !contains_placeholder(template, SERVICE_PLACEHOLDER) {
        errors.push(format!(
            "Services.ServiceTemplateUrl '{}' must contain the '{{{}}}' placeholder",
            template, SERVICE_PLACEHOLDER
        ));
    }
}

/// AUTHENTICATION VALIDATION
fn validate_authentication(auth: &AuthenticationConfiguration, errors: &mut Vec<String>) {
    validate_absolute_url("Authentication.TokenUrl", &auth.token_url, errors);

    if auth.client_id.is_blank_literal() {
        errors.push("Authentication.ClientId must not be empty".to_string());
    }
    if auth.client_secret.is_blank_literal() {
        errors.push("Authentication.ClientSecret must not be empty".to_string());
    }
}

/// SELECTOR VALIDATION
fn validate_sources(cfg: &AppConfig, errors: &mut Vec<String>) {
    // unknown selector values fall back to the configuration-backed providers
    if let Some(CoordinateSource::Unrecognized(value)) = &cfg.coordinate_source {
        warn!(
            "CoordinateSource '{}' is not recognized; configuration-backed coordinates will be used",
            value
        );
    }
    if let Some(EmployeeAddressesSource::Unrecognized(value)) = &cfg.employee_addresses_source {
        warn!(
            "EmployeeAddressesSource '{}' is not recognized; configuration-backed addresses will be used",
            value
        );
    }

    if cfg.coordinate_source() == CoordinateSource::Nominatim {
        validate_absolute_url("Nominatim.BaseUrl", &cfg.nominatim.base_url, errors);
    }
}

/// EMPLOYEE DATA VALIDATION
fn validate_employees(employees: &EmployeesConfig, errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for address in &employees.addresses {
        if address.employee_id.trim().is_empty() {
            errors.push("Employees.Addresses: EmployeeId must not be empty".to_string());
        } else if !seen.insert(address.employee_id.as_str()) {
            errors.push(format!(
                "Employees.Addresses: duplicate EmployeeId '{}'",
                address.employee_id
            ));
        }
    }

    let mut seen = HashSet::new();
    for coordinate in &employees.coordinates {
        if !seen.insert(coordinate.employee_id.as_str()) {
            errors.push(format!(
                "Employees.Coordinates: duplicate EmployeeId '{}'",
                coordinate.employee_id
            ));
        }
        if !(-90.0..=90.0).contains(&coordinate.latitude) {
            errors.push(format!(
                "Employees.Coordinates['{}'].Latitude {} out of range [-90, 90]",
                coordinate.employee_id, coordinate.latitude
            ));
        }
        if !(-180.0..=180.0).contains(&coordinate.longitude) {
            errors.push(format!(
                "Employees.Coordinates['{}'].Longitude {} out of range [-180, 180]",
                coordinate.employee_id, coordinate.longitude
            ));
        }
    }
}

/// COMPANY / CIRCLES VALIDATION
fn validate_company(company: &CompanyInformation, errors: &mut Vec<String>) {
    if company.name.trim().is_empty() {
        errors.push("Company.Name must not be empty".to_string());
    }
    if !(-90.0..=90.0).contains(&company.latitude) {
        errors.push(format!("Company.Latitude {} out of range [-90, 90]", company.latitude));
    }
    if !(-180.0..=180.0).contains(&company.longitude) {
        errors.push(format!("Company.Longitude {} out of range [-180, 180]", company.longitude));
    }
}

fn validate_circles(circles: &[CircleProperty], errors: &mut Vec<String>) {
    for (idx, circle) in circles.iter().enumerate() {
        if !circle.radius_km.is_finite() || circle.radius_km <= 0.0 {
            errors.push(format!("Circles[{}].RadiusKm must be > 0, got {}", idx, circle.radius_km));
        }
        if circle.color.trim().is_empty() {
            errors.push(format!("Circles[{}].Color must not be empty", idx));
        }
    }
}

fn validate_absolute_url(path: &str, value: &str, errors: &mut Vec<String>) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(format!(
            "{} '{}' must use http or https, got '{}'",
            path,
            value,
            url.scheme()
        )),
        Err(err) => errors.push(format!("{} '{}' is not an absolute URL: {}", path, value, err)),
    }
}
