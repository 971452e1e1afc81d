//! Client error types

use thiserror::Error;

use crate::auth::AuthError;

/// Errors that can occur while building or calling a client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network/HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Token acquisition failed
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Control plane rejected the request
    #[error("Operation failed ({status}): {message}")]
    Operation { status: u16, message: String },

    /// Client cannot serve this request with its configuration
    #[error("Client configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create an operation error
    pub fn operation(status: u16, message: impl Into<String>) -> Self {
        Self::Operation {
            status,
            message: message.into(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
