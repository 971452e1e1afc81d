//! Connection error types

use thiserror::Error;

use crate::auth::AuthError;
use crate::clients::ClientError;
use crate::profiles::{ProfileError, ResourceFamily};

/// Errors surfaced by a connection
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Missing or invalid input; the caller must fix it
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Cannot create client for unknown resource family '{0}'")]
    UnknownResourceFamily(String),

    #[error(
        "Error fetching api profile {profile} for {family}. Profile does not exist. Available profiles: {}",
        available.join(", ")
    )]
    Profile {
        profile: String,
        family: ResourceFamily,
        available: Vec<String>,
    },

    #[error(
        "Unable to fetch api namespace '{namespace}' in api profile '{profile}' ({reason}). \
         This is most likely caused by using the incorrect api profile for your system. \
         Supply an explicit api_version to override it."
    )]
    NamespaceNotFound {
        namespace: String,
        profile: String,
        reason: String,
    },

    #[error(
        "Unable to find resource type '{resource_type}' in namespace '{namespace}' for api profile '{profile}'. \
         This api profile may not support that resource type. Supply an explicit api_version to override it."
    )]
    ResourceTypeNotFound {
        resource_type: String,
        namespace: String,
        profile: String,
    },

    #[error("Authentication error: {0}")]
    Auth(AuthError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),
}

impl From<AuthError> for ConnectionError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingField(_) => Self::Configuration(err.to_string()),
            other => Self::Auth(other),
        }
    }
}

impl From<ProfileError> for ConnectionError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::UnknownFamily(name) => Self::UnknownResourceFamily(name),
            ProfileError::NotFound {
                profile,
                family,
                available,
            } => Self::Profile {
                profile,
                family,
                available,
            },
        }
    }
}

pub type ConnectionResult<T> = Result<T, ConnectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_is_configuration_error() {
        let err: ConnectionError = AuthError::MissingField("client_secret").into();
        assert!(matches!(err, ConnectionError::Configuration(ref m) if m.contains("client_secret")));

        let err: ConnectionError = AuthError::InvalidResponse("no token".to_string()).into();
        assert!(matches!(err, ConnectionError::Auth(_)));
    }

    #[test]
    fn test_namespace_errors_suggest_override() {
        let err = ConnectionError::NamespaceNotFound {
            namespace: "Microsoft.Nope".to_string(),
            profile: "Latest".to_string(),
            reason: "404".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("Microsoft.Nope"));
        assert!(message.contains("Latest"));
        assert!(message.contains("api_version"));
    }
}
