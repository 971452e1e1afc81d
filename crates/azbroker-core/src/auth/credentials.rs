//! Credential bundle handed to client constructors

use std::fmt;
use std::sync::Arc;

use super::token::AccessToken;
use super::traits::{AuthResult, TokenProvider, TokenProviderKind};
use crate::cloud::ActiveDirectorySettings;

/// Shared handle on a token provider
#[derive(Clone)]
pub struct TokenCredentials {
    provider: Arc<dyn TokenProvider>,
}

impl TokenCredentials {
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn TokenProvider> {
        &self.provider
    }

    pub fn provider_kind(&self) -> TokenProviderKind {
        self.provider.kind()
    }

    pub fn token(&self) -> AuthResult<AccessToken> {
        self.provider.token()
    }

    /// `Authorization` header value for the next request
    pub fn authorization_header(&self) -> AuthResult<String> {
        Ok(self.provider.token()?.authorization_header())
    }

    /// Credentials for the same identity issuing tokens for `audience`
    pub fn scoped(&self, audience: &str) -> Self {
        Self::new(self.provider.with_audience(audience))
    }
}

impl fmt::Debug for TokenCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCredentials")
            .field("provider", &self.provider)
            .finish()
    }
}

/// Everything a client needs to authenticate against one cloud
///
/// Built once per connection. Clients receive cloned views with their own
/// base URL and, where needed, their own token audience; the connection's
/// bundle is never modified after construction.
#[derive(Clone)]
pub struct CredentialBundle {
    pub credentials: TokenCredentials,
    pub subscription_id: Option<String>,
    pub tenant_id: Option<String>,
    /// Absent (not empty) when authenticating without a client id
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub active_directory_settings: ActiveDirectorySettings,
    /// Service URL for the client this view was made for
    pub base_url: Option<String>,
    /// Audience override for the client this view was made for
    pub token_audience: Option<String>,
}

impl CredentialBundle {
    /// Cloned view pointing at another service URL
    pub fn with_base_url(&self, base_url: impl Into<String>) -> Self {
        let mut view = self.clone();
        view.base_url = Some(base_url.into());
        view
    }

    /// Cloned view whose tokens are issued for `audience`
    pub fn scoped(&self, audience: &str) -> Self {
        let mut view = self.clone();
        view.credentials = self.credentials.scoped(audience);
        view.active_directory_settings = self.active_directory_settings.with_token_audience(audience);
        view.token_audience = Some(audience.to_string());
        view
    }

    pub fn provider_kind(&self) -> TokenProviderKind {
        self.credentials.provider_kind()
    }
}

impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("credentials", &self.credentials)
            .field("subscription_id", &self.subscription_id)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("active_directory_settings", &self.active_directory_settings)
            .field("base_url", &self.base_url)
            .field("token_audience", &self.token_audience)
            .finish()
    }
}
