//! Access tokens and the per-provider token cache

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde_json::Value;

use super::traits::{AuthError, AuthResult};

/// Tokens are considered stale this long before they actually expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed when the response does not say
const DEFAULT_EXPIRES_IN: u64 = 3600;

/// A bearer token and when it stops being valid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: Instant,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "Bearer".to_string(),
            expires_at: Instant::now() + expires_in,
        }
    }

    /// True once the token is within the expiry margin
    pub fn is_stale(&self) -> bool {
        Instant::now() + EXPIRY_MARGIN >= self.expires_at
    }

    /// Value for an `Authorization` header
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// Parse an OAuth2 token endpoint response
///
/// `expires_in` arrives as a number from the directory and as a string from
/// managed identity endpoints; both are accepted.
pub fn parse_token_response(body: &str) -> AuthResult<AccessToken> {
    let parsed: Value = serde_json::from_str(body)?;

    let access_token = parsed
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AuthError::InvalidResponse("no access_token in token response".into()))?
        .to_string();

    let token_type = parsed
        .get("token_type")
        .and_then(|v| v.as_str())
        .unwrap_or("Bearer")
        .to_string();

    let expires_in = parsed
        .get("expires_in")
        .and_then(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
        .unwrap_or(DEFAULT_EXPIRES_IN);

    Ok(AccessToken {
        access_token,
        token_type,
        expires_at: Instant::now() + Duration::from_secs(expires_in),
    })
}

/// Last token issued by a provider
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: Mutex<Option<AccessToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached token, or fetch, store and return a new one
    pub fn get_or_fetch<F>(&self, fetch: F) -> AuthResult<AccessToken>
    where
        F: FnOnce() -> AuthResult<AccessToken>,
    {
        let mut slot = self.slot.lock();
        if let Some(token) = slot.as_ref() {
            if !token.is_stale() {
                return Ok(token.clone());
            }
        }

        let token = fetch()?;
        *slot = Some(token.clone());
        Ok(token)
    }

    pub fn clear(&self) {
        *self.slot.lock() = None;
    }
}
