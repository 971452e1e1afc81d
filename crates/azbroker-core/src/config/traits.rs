//! Configuration traits and errors

use std::collections::HashMap;

use super::options::ConnectionOptions;

/// Source of credential fields merged into options before authentication
///
/// Implementations:
/// - `FileCredentials`: INI-style `~/.azure/credentials` file
/// - Test doubles returning a fixed map
pub trait CredentialSource: Send + Sync {
    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Where the fields for these options come from, for logs and strategy labels
    fn describe(&self, _options: &ConnectionOptions) -> String {
        self.name().to_string()
    }

    /// Load credential fields for the given options
    ///
    /// The returned map uses option names as keys (`tenant_id`,
    /// `client_id`, `client_secret`, `subscription_id`). An empty map means
    /// the source has nothing to contribute.
    fn load(&self, options: &ConnectionOptions) -> ConfigResult<HashMap<String, String>>;
}

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed credentials file {path}: {message}")]
    Malformed { path: String, message: String },

    #[error("Configuration error: {0}")]
    Other(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
