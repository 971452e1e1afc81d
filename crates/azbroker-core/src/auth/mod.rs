//! Authentication
//!
//! - `CredentialResolver`: picks the strategy for a connection
//! - `AuthStrategy`: service principal, managed identity, or credentials file
//! - `TokenProvider`: bearer tokens on demand, one implementation per identity
//! - `CredentialBundle`: what clients receive to authenticate
//! - `TcpProbe`: bounded reachability check for the managed identity endpoint

mod traits;
mod token;
mod service_principal;
mod managed_identity;
mod credentials;
mod probe;
mod strategy;
mod resolver;

pub use traits::{AuthError, AuthResult, TokenProvider, TokenProviderKind};
pub use token::{parse_token_response, AccessToken, TokenCache};
pub use service_principal::ServicePrincipalTokenProvider;
pub use managed_identity::{
    msi_vm_enabled, set_msi_vm_flag, ManagedIdentityEndpoint, ManagedIdentityTokenProvider, MSI_VM_ENV,
};
pub use credentials::{CredentialBundle, TokenCredentials};
pub use probe::{EndpointProbe, TcpProbe, DEFAULT_PROBE_TIMEOUT};
pub use strategy::AuthStrategy;
pub use resolver::{CredentialResolver, ResolvedCredentials};
