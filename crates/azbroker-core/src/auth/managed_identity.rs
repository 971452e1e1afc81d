//! Managed identity token provider
//!
//! Two endpoints exist. Inside a managed-identity capable VM (signalled by
//! the `MSI_VM` environment flag) tokens come from the instance metadata
//! service; otherwise from the VM extension listening on a localhost port.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use super::token::{parse_token_response, AccessToken, TokenCache};
use super::traits::{AuthError, AuthResult, TokenProvider, TokenProviderKind};
use crate::cloud::ActiveDirectorySettings;

/// Process-wide flag set when managed identity authentication is selected
pub const MSI_VM_ENV: &str = "MSI_VM";

const IMDS_TOKEN_URL: &str = "http://169.254.169.254/metadata/identity/oauth2/token";
const IMDS_API_VERSION: &str = "2018-02-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Whether the process has been flagged as running on a managed identity host
pub fn msi_vm_enabled() -> bool {
    env::var(MSI_VM_ENV)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Flag the process as running on a managed identity host
pub fn set_msi_vm_flag() {
    env::set_var(MSI_VM_ENV, "true");
}

/// Where managed identity tokens are requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagedIdentityEndpoint {
    /// VM extension on a localhost port
    Extension { url: String },
    /// Instance metadata service; needs an `api-version` query parameter
    MetadataService { url: String },
}

impl ManagedIdentityEndpoint {
    pub fn extension(port: u16) -> Self {
        Self::Extension {
            url: format!("http://localhost:{}/oauth2/token", port),
        }
    }

    pub fn metadata_service() -> Self {
        Self::MetadataService {
            url: IMDS_TOKEN_URL.to_string(),
        }
    }

    /// Endpoint for the current process, following the `MSI_VM` flag
    pub fn detect(port: u16) -> Self {
        if msi_vm_enabled() {
            Self::metadata_service()
        } else {
            Self::extension(port)
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Extension { url } | Self::MetadataService { url } => url,
        }
    }

    fn query<'a>(&self, resource: &'a str) -> Vec<(&'static str, &'a str)> {
        match self {
            Self::Extension { .. } => vec![("resource", resource)],
            Self::MetadataService { .. } => vec![("resource", resource), ("api-version", IMDS_API_VERSION)],
        }
    }
}

/// Issues tokens from the host-local managed identity endpoint
#[derive(Debug)]
pub struct ManagedIdentityTokenProvider {
    port: u16,
    endpoint: ManagedIdentityEndpoint,
    settings: ActiveDirectorySettings,
    cache: TokenCache,
}

impl ManagedIdentityTokenProvider {
    /// Provider for `port`, with the endpoint chosen by `MSI_VM`
    pub fn new(port: u16, settings: ActiveDirectorySettings) -> Self {
        Self::with_endpoint(port, ManagedIdentityEndpoint::detect(port), settings)
    }

    pub fn with_endpoint(port: u16, endpoint: ManagedIdentityEndpoint, settings: ActiveDirectorySettings) -> Self {
        Self {
            port,
            endpoint,
            settings,
            cache: TokenCache::new(),
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn endpoint(&self) -> &ManagedIdentityEndpoint {
        &self.endpoint
    }

    fn request_token(&self) -> AuthResult<AccessToken> {
        let url = self.endpoint.url();

        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let response = client
            .get(url)
            .header("Metadata", "true")
            .query(&self.endpoint.query(&self.settings.token_audience))
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(AuthError::TokenRequest {
                endpoint: url.to_string(),
                status: status.as_u16(),
                message: body,
            });
        }

        parse_token_response(&body)
    }
}

impl TokenProvider for ManagedIdentityTokenProvider {
    fn kind(&self) -> TokenProviderKind {
        TokenProviderKind::ManagedIdentity
    }

    fn settings(&self) -> &ActiveDirectorySettings {
        &self.settings
    }

    fn token(&self) -> AuthResult<AccessToken> {
        self.cache.get_or_fetch(|| self.request_token())
    }

    fn with_audience(&self, audience: &str) -> Arc<dyn TokenProvider> {
        Arc::new(Self::with_endpoint(
            self.port,
            self.endpoint.clone(),
            self.settings.with_token_audience(audience),
        ))
    }
}
