//! Authentication strategies

use std::fmt;
use std::sync::Arc;

use super::managed_identity::ManagedIdentityTokenProvider;
use super::service_principal::ServicePrincipalTokenProvider;
use super::traits::{AuthResult, TokenProvider, TokenProviderKind};
use crate::cloud::ActiveDirectorySettings;

/// How a connection authenticates; exactly one per connection
#[derive(Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Explicit client id and secret
    ServicePrincipal {
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
    /// Host-local managed identity endpoint
    ManagedIdentity { port: u16 },
    /// Client id and secret read from a credentials source
    CredentialsFile {
        source: String,
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
}

impl AuthStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ServicePrincipal { .. } => "service_principal",
            Self::ManagedIdentity { .. } => "managed_identity",
            Self::CredentialsFile { .. } => "credentials_file",
        }
    }

    /// Kind of token provider this strategy produces
    pub fn provider_kind(&self) -> TokenProviderKind {
        match self {
            Self::ManagedIdentity { .. } => TokenProviderKind::ManagedIdentity,
            Self::ServicePrincipal { .. } | Self::CredentialsFile { .. } => {
                TokenProviderKind::ServicePrincipal
            }
        }
    }

    /// Build the token provider for this strategy
    pub fn token_provider(&self, settings: &ActiveDirectorySettings) -> AuthResult<Arc<dyn TokenProvider>> {
        let provider: Arc<dyn TokenProvider> = match self {
            Self::ManagedIdentity { port } => {
                Arc::new(ManagedIdentityTokenProvider::new(*port, settings.clone()))
            }
            Self::ServicePrincipal {
                tenant_id,
                client_id,
                client_secret,
            }
            | Self::CredentialsFile {
                tenant_id,
                client_id,
                client_secret,
                ..
            } => Arc::new(ServicePrincipalTokenProvider::new(
                tenant_id,
                client_id,
                client_secret,
                settings.clone(),
            )?),
        };
        Ok(provider)
    }
}

impl fmt::Debug for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServicePrincipal { tenant_id, client_id, .. } => f
                .debug_struct("ServicePrincipal")
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .finish_non_exhaustive(),
            Self::ManagedIdentity { port } => f.debug_struct("ManagedIdentity").field("port", port).finish(),
            Self::CredentialsFile {
                source,
                tenant_id,
                client_id,
                ..
            } => f
                .debug_struct("CredentialsFile")
                .field("source", source)
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .finish_non_exhaustive(),
        }
    }
}
