use std::collections::BTreeMap;
use std::fmt;

use crate::auth::token::AccessToken;

/// Settings of an outbound API client.
///
/// Two instances combine with [`ClientConfiguration::merge`]: a *credential*
/// configuration (usually only `access_token`) laid over a *base* one.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ClientConfiguration {
    pub base_path: Option<String>,
    pub access_token: Option<String>,
    pub default_headers: BTreeMap<String, String>,
    pub timeout_ms: Option<u64>,
    pub user_agent: Option<String>,
    pub api_key: BTreeMap<String, String>,
    pub api_key_prefix: BTreeMap<String, String>,
}

impl ClientConfiguration {
    pub fn for_base_path(base_path: impl Into<String>) -> Self {
        Self {
            base_path: Some(base_path.into()),
            ..Default::default()
        }
    }

    /// Credential-only configuration carrying nothing but the token.
    pub fn with_access_token(token: &AccessToken) -> Self {
        Self {
            access_token: Some(token.as_str().to_owned()),
            ..Default::default()
        }
    }

    /// Field by field: the non-empty credential value wins, otherwise the base value.
    /// Maps merge per key with the same rule. Neither input is modified.
    pub fn merge(credential: &ClientConfiguration, base: &ClientConfiguration) -> ClientConfiguration {
        ClientConfiguration {
            base_path: pick_string(&credential.base_path, &base.base_path),
            access_token: pick_string(&credential.access_token, &base.access_token),
            default_headers: merge_maps(&credential.default_headers, &base.default_headers),
            timeout_ms: credential.timeout_ms.filter(|t| *t > 0).or(base.timeout_ms),
            user_agent: pick_string(&credential.user_agent, &base.user_agent),
            api_key: merge_maps(&credential.api_key, &base.api_key),
            api_key_prefix: merge_maps(&credential.api_key_prefix, &base.api_key_prefix),
        }
    }

    pub fn base_path(&self) -> &str {
        self.base_path.as_deref().unwrap_or_default()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|token| !token.is_empty())
    }

    /// `api_key` value with its optional prefix, e.g. `Bearer abc`.
    pub fn api_key_with_prefix(&self, name: &str) -> Option<String> {
        let key = self.api_key.get(name).filter(|k| !k.is_empty())?;
        Some(match self.api_key_prefix.get(name).filter(|p| !p.is_empty()) {
            Some(prefix) => format!("{} {}", prefix, key),
            None => key.to_owned(),
        })
    }
}

fn pick_string(credential: &Option<String>, base: &Option<String>) -> Option<String> {
    credential
        .as_ref()
        .filter(|value| !value.is_empty())
        .or(base.as_ref())
        .cloned()
}

fn merge_maps(credential: &BTreeMap<String, String>, base: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut merged = base.clone();
    for (key, value) in credential.iter().filter(|(_, v)| !v.is_empty()) {
        merged.insert(key.to_owned(), value.to_owned());
    }
    merged
}

impl fmt::Debug for ClientConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfiguration")
            .field("base_path", &self.base_path)
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("default_headers", &self.default_headers)
            .field("timeout_ms", &self.timeout_ms)
            .field("user_agent", &self.user_agent)
            .field("api_key", &self.api_key.keys().collect::<Vec<_>>())
            .field("api_key_prefix", &self.api_key_prefix)
            .finish()
    }
}
