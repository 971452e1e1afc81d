//! azbroker Core
//!
//! Connection broker for Azure control-plane APIs.
//! A connection decides how to authenticate, which cloud's endpoints to talk
//! to, and which API version each resource type speaks; callers get
//! configured clients per resource family.
//!
//! ## Connecting
//!
//! Options come from the environment (`AZURE_*`), a YAML file, or explicit
//! overrides. Credentials are resolved once: explicit service principal
//! secrets, then the credentials file, then a local managed identity
//! endpoint.
//!
//! ```rust,ignore
//! use azbroker_core::{ClientOptions, Connection, ConnectionOptions, ResourceFamily, VersionOptions};
//!
//! let conn = Connection::new(ConnectionOptions::from_env())?;
//!
//! // Negotiated once per resource type, then cached
//! let version = conn.get_api_version("Microsoft.Compute/virtualMachines", &VersionOptions::default())?;
//!
//! // Cached per resource family
//! let vault = conn.get_client(ResourceFamily::Vault, &ClientOptions::vault("my-vault"))?;
//! ```

pub mod logging;
pub mod config;
pub mod cloud;
pub mod auth;
pub mod profiles;
pub mod clients;
pub mod connection;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use logging::{Logger, NoOpLogger, SharedLogger, TracingLogger};

pub use config::{ConfigError, ConfigResult, ConnectionOptions, CredentialSource, FileCredentials};

pub use cloud::{resolve_environment, ActiveDirectorySettings, CloudEndpointConfig, CloudEnvironment};

pub use auth::{
    AuthError, AuthResult, AuthStrategy, CredentialBundle, CredentialResolver, EndpointProbe, TcpProbe,
    TokenCredentials, TokenProvider, TokenProviderKind,
};

pub use profiles::{
    global_profile_registry, register_api_profile, ApiProfile, ClientConfig, ClientFactory, ProfileRegistry,
    ResourceFamily,
};

pub use clients::{
    ApiClient, ClientError, ClientResult, GraphClient, ManagementClient, ProviderOperations, ProviderRecord,
    SharedClient, VaultClient,
};

pub use connection::{
    ClientOptions, Connection, ConnectionBuilder, ConnectionError, ConnectionResult, PlatformInfo, VersionOptions,
};
