//! Capability interfaces and their interchangeable implementations.
//!
//! Address and coordinate capabilities have a closed set of implementations,
//! collected in an enum and picked once at startup by [`selector`]. Company,
//! circle property and circle information capabilities have a single
//! implementation each.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::config::circles::CircleProperty;
use crate::config::company::CompanyInformation;
use crate::config::employees::{EmployeeAddress, EmployeeCoordinate};
use crate::error::ComposeResult;

pub mod addresses;
pub mod circles;
pub mod company;
pub mod coordinates;
pub mod selector;

pub use addresses::AddressesProvider;
pub use circles::{CircleInformation, ConfigurationCirclesPropertyProvider, EmployeeCirclesInformationProvider};
pub use company::ConfigurationCompanyInformationProvider;
pub use coordinates::CoordinatesProvider;

/// "Provide the postal addresses of all employees."
pub trait EmployeeAddressesProvider: Send + Sync {
    fn employee_addresses(
        &self,
        cancel: &CancellationToken,
    ) -> impl Future<Output = ComposeResult<Vec<EmployeeAddress>>> + Send;
}

/// "Provide map coordinates for all employees."
pub trait EmployeeCoordinatesProvider: Send + Sync {
    fn employee_coordinates(
        &self,
        cancel: &CancellationToken,
    ) -> impl Future<Output = ComposeResult<Vec<EmployeeCoordinate>>> + Send;
}

/// "Provide the company location."
pub trait CompanyInformationProvider: Send + Sync {
    fn company_information(
        &self,
        cancel: &CancellationToken,
    ) -> impl Future<Output = ComposeResult<CompanyInformation>> + Send;
}

/// "Provide the display properties of the distance circles."
pub trait CirclesPropertyProvider: Send + Sync {
    fn circle_properties(
        &self,
        cancel: &CancellationToken,
    ) -> impl Future<Output = ComposeResult<Vec<CircleProperty>>> + Send;
}

/// "Provide the distance circles around the company with their employee counts."
pub trait CirclesInformationProvider: Send + Sync {
    fn circles_information(
        &self,
        cancel: &CancellationToken,
    ) -> impl Future<Output = ComposeResult<Vec<CircleInformation>>> + Send;
}
