//! Core traits and types for token acquisition

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::token::AccessToken;
use crate::cloud::ActiveDirectorySettings;

/// Which kind of identity backs a token provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenProviderKind {
    /// Application (client id + secret) credentials
    ServicePrincipal,
    /// Host-local managed identity endpoint
    ManagedIdentity,
}

impl TokenProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServicePrincipal => "service_principal",
            Self::ManagedIdentity => "managed_identity",
        }
    }
}

impl fmt::Display for TokenProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while resolving credentials or acquiring tokens
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0} is required for service principal authentication")]
    MissingField(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token request to {endpoint} failed ({status}): {message}")]
    TokenRequest {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Invalid token response: {0}")]
    InvalidResponse(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Capability that produces bearer tokens on demand
///
/// Implementations own their own caching; nothing in this crate schedules
/// refreshes.
pub trait TokenProvider: Send + Sync + fmt::Debug {
    /// Identity backing this provider
    fn kind(&self) -> TokenProviderKind;

    /// Directory settings (authority and audience) this provider uses
    fn settings(&self) -> &ActiveDirectorySettings;

    /// Get a valid access token, requesting a new one if needed
    fn token(&self) -> AuthResult<AccessToken>;

    /// Same identity, issuing tokens for another audience
    fn with_audience(&self, audience: &str) -> Arc<dyn TokenProvider>;
}
