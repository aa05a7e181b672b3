use anyhow::{anyhow, Result};
use base64::Engine;
use serde::Deserialize;
use tracing::debug;

use crate::auth::token::AccessToken;
use crate::helpers::time::{expires_in_seconds, from_unix_seconds};

/// OAuth2 token endpoint response (RFC 6749 §5.1)
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
    token_type: Option<String>,
}

// jwt token
#[derive(Debug, Deserialize)]
struct JwtClaims {
    exp: u64,
}

/// Parse the token endpoint body into an [`AccessToken`].
///
/// Expiry comes from `expires_in` when present, else from the JWT `exp`
/// claim; opaque tokens without either simply carry no expiry.
pub fn parse_token_response(body: &str) -> Result<AccessToken> {
    let response: TokenResponse = serde_json::from_str(body)
        .map_err(|e| anyhow!("token response is not valid JSON: {}", e))?;

    if response.access_token.trim().is_empty() {
        return Err(anyhow!("token response contains an empty access_token"));
    }

    if let Some(token_type) = response.token_type.as_deref() {
        if !token_type.eq_ignore_ascii_case("bearer") {
            debug!(token_type, "token_type is not bearer, using it as a bearer token anyway");
        }
    }

    let expires_at = response
        .expires_in
        .and_then(expires_in_seconds)
        .or_else(|| {
            decode_jwt_expiration(&response.access_token)
                .inspect_err(|e| debug!("token carries no readable exp claim: {}", e))
                .ok()
                .and_then(from_unix_seconds)
        });

    Ok(AccessToken::new(response.access_token).with_expiry(expires_at))
}

fn decode_jwt_expiration(token_string: &str) -> Result<u64> {
    let parts: Vec<&str> = token_string.split('.').collect();
    if parts.len() != 3 {
        return Err(anyhow!("invalid JWT format"));
    }

    let payload = parts[1].trim_end_matches('=');
    let decoded = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| anyhow!("base64 decode error: {}", e))?;

    serde_json::from_slice::<JwtClaims>(&decoded)
        .map(|claims| claims.exp)
        .map_err(|e| anyhow!("invalid JWT payload: {}", e))
}
