use tracing::debug;

use crate::config::services::ServicesConfiguration;
use crate::error::{ComposeError, ComposeResult};
use crate::parser::template::{interpolate, SERVICE_PLACEHOLDER};

/// Effective endpoint for `service_id`.
///
/// A non-empty `explicit_url` is returned untouched (no parsing, no checks);
/// otherwise `service_id` is substituted into the template's `{service}` placeholder.
pub fn resolve(explicit_url: Option<&str>, template: &str, service_id: &str) -> ComposeResult<String> {
    if let Some(url) = explicit_url.filter(|url| !url.trim().is_empty()) {
        debug!(service_id, "using explicit service url");
        return Ok(url.to_owned());
    }

    if template.trim().is_empty() {
        return Err(ComposeError::configuration(format!(
            "no url for service '{}': neither an explicit url nor a service template is configured",
            service_id
        )));
    }

    interpolate(template, SERVICE_PLACEHOLDER, service_id)
        .inspect(|url| debug!(service_id, %url, "service url from template"))
        .map_err(|e| ComposeError::configuration(format!("no url for service '{}': {}", service_id, e)))
}

pub fn resolve_services(services: &ServicesConfiguration, service_id: &str) -> ComposeResult<String> {
    resolve(
        services.stamm_service_url.as_deref(),
        &services.service_template_url,
        service_id,
    )
}
