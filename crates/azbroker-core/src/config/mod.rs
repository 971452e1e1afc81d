//! Connection configuration
//!
//! - `ConnectionOptions`: every setting a connection understands, loaded
//!   from the environment, YAML, or explicit overrides
//! - `CredentialSource`: pluggable source of credential fields
//! - `FileCredentials`: INI-style `~/.azure/credentials` reader

mod traits;
mod options;
mod credentials_file;

pub use traits::{ConfigError, ConfigResult, CredentialSource};
pub use options::{ConnectionOptions, DEFAULT_API_PROFILE, DEFAULT_MSI_PORT};
pub use credentials_file::{default_credentials_path, CredentialSection, FileCredentials};
