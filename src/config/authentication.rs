use serde::Deserialize;
use std::{env, fs};

use crate::error::{ComposeError, ComposeResult};

/// `Authentication` section: OAuth2 client-credentials settings.
/// May be omitted when no OBS-Stamm client is needed.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct AuthenticationConfiguration {
    /// Absolute URL of the token endpoint.
    pub token_url: String,
    pub client_id: SecretValue,
    pub client_secret: SecretValue,
    pub scope: Option<String>,
    pub audience: Option<String>,
    #[serde(default)]
    pub client_authentication: ClientAuthentication,
}

/// How client credentials travel to the token endpoint.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClientAuthentication {
    /// `client_id` / `client_secret` in the form body
    #[default]
    Post,
    /// HTTP Basic authorization header
    Basic,
}

/// Credential value sources
#[derive(Deserialize, Clone)]
#[serde(untagged)]
pub enum SecretValue {
    Plain(String),
    Literal {
        #[serde(rename = "Value")]
        value: String,
    },
    FromEnv {
        #[serde(rename = "FromEnv")]
        from_env: String,
    },
    FromFile {
        #[serde(rename = "FromFile")]
        path: String,
    },
}

impl Default for SecretValue {
    fn default() -> Self {
        SecretValue::Plain(String::new())
    }
}

impl SecretValue {
    /// Resolve the secret at call time; env and file references are read fresh every time.
    pub fn resolve(&self) -> ComposeResult<String> {
        match self {
            SecretValue::Plain(value) | SecretValue::Literal { value } => Ok(value.to_owned()),
            SecretValue::FromEnv { from_env } => env::var(from_env).map_err(|err| {
                ComposeError::configuration(format!(
                    "environment variable '{}' is not available: {}",
                    from_env, err
                ))
            }),
            SecretValue::FromFile { path } => fs::read_to_string(path)
                .map(|content| content.trim().to_string())
                .map_err(|err| {
                    ComposeError::configuration(format!("secret file '{}' is not readable: {}", path, err))
                }),
        }
    }

    pub fn is_blank_literal(&self) -> bool {
        match self {
            SecretValue::Plain(value) | SecretValue::Literal { value } => value.trim().is_empty(),
            SecretValue::FromEnv { from_env } => from_env.trim().is_empty(),
            SecretValue::FromFile { path } => path.trim().is_empty(),
        }
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretValue::Plain(_) | SecretValue::Literal { .. } => f.write_str("SecretValue::Literal(***)"),
            SecretValue::FromEnv { from_env } => write!(f, "SecretValue::FromEnv({})", from_env),
            SecretValue::FromFile { path } => write!(f, "SecretValue::FromFile({})", path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn plain_and_literal_values_resolve_as_is() {
        let plain: SecretValue = serde_yaml::from_str("dashboard").unwrap();
        assert_eq!(plain.resolve().unwrap(), "dashboard");

        let literal: SecretValue = serde_yaml::from_str("Value: s3cr3t").unwrap();
        assert_eq!(literal.resolve().unwrap(), "s3cr3t");
    }

    #[test]
    #[serial]
    fn env_value_is_read_at_resolve_time() {
        let value: SecretValue = serde_yaml::from_str("FromEnv: DASHBOARD_TEST_SECRET").unwrap();
        std::env::remove_var("DASHBOARD_TEST_SECRET");
        assert!(matches!(value.resolve(), Err(ComposeError::Configuration(_))));

        std::env::set_var("DASHBOARD_TEST_SECRET", "from-env");
        assert_eq!(value.resolve().unwrap(), "from-env");
        std::env::remove_var("DASHBOARD_TEST_SECRET");
    }

    #[test]
    fn file_value_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  file-secret  ").unwrap();
        let yaml = format!("FromFile: {}", file.path().display());
        let value: SecretValue = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(value.resolve().unwrap(), "file-secret");
    }

    #[test]
    fn debug_output_hides_literal_secrets() {
        let value = SecretValue::Literal { value: "hunter2".into() };
        assert!(!format!("{:?}", value).contains("hunter2"));
    }
}
