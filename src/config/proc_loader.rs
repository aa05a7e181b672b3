use std::path::Path;

use regex::Regex;
use tracing::{debug, error};

use crate::config::proc_validator;
use crate::config::types::AppConfig;
use crate::error::{ComposeError, ComposeResult};

/// Load, expand and validate config from YAML file
pub async fn file_to_config(path: &Path) -> ComposeResult<AppConfig> {
    let content = tokio::fs::read_to_string(path).await.map_err(|err| {
        ComposeError::configuration(format!("cannot read config '{}': {}", path.display(), err))
    })?;

    let expanded = expand_env_vars(&content)?;
    parse_config(expanded).await
}

pub async fn parse_config(content: String) -> ComposeResult<AppConfig> {
    let config: AppConfig = serde_yaml::from_str(&content)
        .inspect_err(|e| error!("parse config error: {}", e))
        .map_err(|e| ComposeError::configuration(format!("invalid config format: {}", e)))?;

    debug!("validation config ...");
    proc_validator::validate_app_config(&config)
        .await
        .map_err(|errors| {
            ComposeError::configuration(format!(
                "config is not valid, total errors: {}, \n{}",
                errors.len(),
                errors.join("\n")
            ))
        })?;

    Ok(config)
}

/// Replace `${VAR}` and `${VAR:default}` with the environment value (or the default).
pub fn expand_env_vars(input: &str) -> ComposeResult<String> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]*))?\}")
        .map_err(|e| ComposeError::configuration(e.to_string()))?;
    let expanded = re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    });
    Ok(expanded.to_string())
}
