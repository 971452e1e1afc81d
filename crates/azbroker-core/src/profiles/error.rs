//! Profile lookup errors

use thiserror::Error;

use super::family::ResourceFamily;

/// Errors that can occur while resolving an API profile
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Cannot create client for unknown resource family '{0}'")]
    UnknownFamily(String),

    #[error(
        "Error fetching api profile {profile} for {family}. Profile does not exist. Available profiles: {}",
        available.join(", ")
    )]
    NotFound {
        profile: String,
        family: ResourceFamily,
        available: Vec<String>,
    },
}

pub type ProfileResult<T> = Result<T, ProfileError>;
