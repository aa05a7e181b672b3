use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::auth::provider::{AccessTokenProvider, TokenProvider};
use crate::config::circles::CircleProperty;
use crate::error::ComposeResult;
use crate::providers::company::ConfigurationCompanyInformationProvider;
use crate::providers::coordinates::CoordinatesProvider;
use crate::providers::{
    CirclesInformationProvider, CirclesPropertyProvider, CompanyInformationProvider, EmployeeCoordinatesProvider,
};
use crate::utils::constants::EARTH_RADIUS_KM;

/// Circle properties from the `Circles` section, innermost first.
#[derive(Debug, Clone)]
pub struct ConfigurationCirclesPropertyProvider {
    circles: Arc<Vec<CircleProperty>>,
}

impl ConfigurationCirclesPropertyProvider {
    pub fn new(mut circles: Vec<CircleProperty>) -> Self {
        circles.sort_by(|a, b| a.radius_km.total_cmp(&b.radius_km));
        Self {
            circles: Arc::new(circles),
        }
    }
}

impl CirclesPropertyProvider for ConfigurationCirclesPropertyProvider {
    async fn circle_properties(&self, _cancel: &CancellationToken) -> ComposeResult<Vec<CircleProperty>> {
        Ok(self.circles.as_ref().clone())
    }
}

/// A distance circle around the company and how many employees live inside it.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CircleInformation {
    pub radius_km: f64,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub employee_count: usize,
}

/// Combines company location, circle properties and the registered
/// coordinates provider. Circles are cumulative: an employee inside the
/// innermost circle counts for every circle.
#[derive(Debug)]
pub struct EmployeeCirclesInformationProvider<P = TokenProvider> {
    company: Arc<ConfigurationCompanyInformationProvider>,
    properties: Arc<ConfigurationCirclesPropertyProvider>,
    coordinates: Arc<CoordinatesProvider<P>>,
}

impl<P: AccessTokenProvider> EmployeeCirclesInformationProvider<P> {
    pub fn new(
        company: Arc<ConfigurationCompanyInformationProvider>,
        properties: Arc<ConfigurationCirclesPropertyProvider>,
        coordinates: Arc<CoordinatesProvider<P>>,
    ) -> Self {
        Self {
            company,
            properties,
            coordinates,
        }
    }
}

impl<P: AccessTokenProvider> CirclesInformationProvider for EmployeeCirclesInformationProvider<P> {
    async fn circles_information(&self, cancel: &CancellationToken) -> ComposeResult<Vec<CircleInformation>> {
        let company = self.company.company_information(cancel).await?;
        let properties = self.properties.circle_properties(cancel).await?;
        let coordinates = self.coordinates.employee_coordinates(cancel).await?;

        let distances: Vec<f64> = coordinates
            .iter()
            .map(|c| distance_km(company.latitude, company.longitude, c.latitude, c.longitude))
            .collect();

        let circles = properties
            .into_iter()
            .map(|circle| {
                let employee_count = distances.iter().filter(|d| **d <= circle.radius_km).count();
                debug!(radius_km = circle.radius_km, employee_count, "circle computed");
                CircleInformation {
                    radius_km: circle.radius_km,
                    color: circle.color,
                    label: circle.label,
                    employee_count,
                }
            })
            .collect();

        Ok(circles)
    }
}

/// Great-circle distance (haversine).
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}
