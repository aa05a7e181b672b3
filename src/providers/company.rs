use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::company::CompanyInformation;
use crate::error::{ComposeError, ComposeResult};
use crate::providers::CompanyInformationProvider;

/// Company location from the `Company` section.
#[derive(Debug, Clone)]
pub struct ConfigurationCompanyInformationProvider {
    company: Option<Arc<CompanyInformation>>,
}

impl ConfigurationCompanyInformationProvider {
    pub fn new(company: Option<CompanyInformation>) -> Self {
        Self {
            company: company.map(Arc::new),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.company.is_some()
    }
}

impl CompanyInformationProvider for ConfigurationCompanyInformationProvider {
    async fn company_information(&self, _cancel: &CancellationToken) -> ComposeResult<CompanyInformation> {
        self.company
            .as_deref()
            .cloned()
            .ok_or_else(|| ComposeError::configuration("Company section is not configured"))
    }
}
