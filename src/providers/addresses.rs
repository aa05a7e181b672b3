use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::auth::provider::{AccessTokenProvider, TokenProvider};
use crate::client::factory::PersonsClientFactory;
use crate::config::employees::EmployeeAddress;
use crate::error::ComposeResult;
use crate::providers::EmployeeAddressesProvider;

/// Addresses listed under `Employees.Addresses`.
#[derive(Debug, Clone)]
pub struct ConfigurationEmployeeAddressesProvider {
    addresses: Arc<Vec<EmployeeAddress>>,
}

impl ConfigurationEmployeeAddressesProvider {
    pub fn new(addresses: Vec<EmployeeAddress>) -> Self {
        Self {
            addresses: Arc::new(addresses),
        }
    }
}

impl EmployeeAddressesProvider for ConfigurationEmployeeAddressesProvider {
    async fn employee_addresses(&self, _cancel: &CancellationToken) -> ComposeResult<Vec<EmployeeAddress>> {
        Ok(self.addresses.as_ref().clone())
    }
}

/// Addresses of the persons known to OBS-Stamm. A fresh authenticated client
/// is created for every call.
#[derive(Debug)]
pub struct ObsStammEmployeeAddressesProvider<P = TokenProvider> {
    persons_clients: Arc<PersonsClientFactory<P>>,
}

impl<P: AccessTokenProvider> ObsStammEmployeeAddressesProvider<P> {
    pub fn new(persons_clients: Arc<PersonsClientFactory<P>>) -> Self {
        Self { persons_clients }
    }
}

impl<P: AccessTokenProvider> EmployeeAddressesProvider for ObsStammEmployeeAddressesProvider<P> {
    async fn employee_addresses(&self, cancel: &CancellationToken) -> ComposeResult<Vec<EmployeeAddress>> {
        let client = self.persons_clients.create(cancel).await?;
        let persons = client.list_persons().await?;
        let total = persons.len();

        let addresses: Vec<EmployeeAddress> = persons
            .into_iter()
            .filter_map(|person| {
                let name = person.display_name();
                match person.address {
                    Some(address) => Some(EmployeeAddress {
                        employee_id: person.id,
                        name,
                        street: address.street,
                        postal_code: address.postal_code,
                        city: address.city,
                        country: address.country,
                    }),
                    None => {
                        warn!("person '{}' has no address, skipped", person.id);
                        None
                    }
                }
            })
            .collect();

        info!("obsstamm returned {} persons, {} with address", total, addresses.len());
        Ok(addresses)
    }
}

/// The address implementation registered at startup.
#[derive(Debug)]
pub enum AddressesProvider<P = TokenProvider> {
    Configuration(ConfigurationEmployeeAddressesProvider),
    ObsStamm(ObsStammEmployeeAddressesProvider<P>),
}

impl<P> AddressesProvider<P> {
    pub fn name(&self) -> &'static str {
        match self {
            AddressesProvider::Configuration(_) => "configuration",
            AddressesProvider::ObsStamm(_) => "obsstamm",
        }
    }
}

impl<P: AccessTokenProvider> EmployeeAddressesProvider for AddressesProvider<P> {
    async fn employee_addresses(&self, cancel: &CancellationToken) -> ComposeResult<Vec<EmployeeAddress>> {
        match self {
            AddressesProvider::Configuration(p) => p.employee_addresses(cancel).await,
            AddressesProvider::ObsStamm(p) => p.employee_addresses(cancel).await,
        }
    }
}
