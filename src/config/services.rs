use serde::Deserialize;

/// `Services` section: where the OBS-Stamm system and its siblings live.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ServicesConfiguration {
    /// Explicit endpoint; wins over the template whenever it is non-empty.
    pub stamm_service_url: Option<String>,
    /// Endpoint template with a `{service}` placeholder, e.g. `https://{service}.internal/api`.
    #[serde(default)]
    pub service_template_url: String,
}

impl ServicesConfiguration {
    pub fn new(stamm_service_url: Option<String>, service_template_url: impl Into<String>) -> Self {
        Self {
            stamm_service_url,
            service_template_url: service_template_url.into(),
        }
    }
}
