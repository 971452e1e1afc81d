//! Cloud environment resolution
//!
//! A connection talks to exactly one cloud. Which one is decided once, from
//! the `cloud_*` options:
//! - no custom fields: the public Azure cloud
//! - a complete custom field set: a descriptor built from those fields
//! - an incomplete set: logged, then the public Azure cloud
//!
//! Resolution never fails.

mod environment;
mod settings;

pub use environment::{CloudEndpointConfig, CloudEnvironment, EnvironmentError, PUBLIC_CLOUD_NAME};
pub use settings::ActiveDirectorySettings;

use crate::logging::Logger;

/// Resolve the cloud a connection should use
pub fn resolve_environment(config: &CloudEndpointConfig, logger: &dyn Logger) -> CloudEnvironment {
    if config.is_empty() {
        crate::log_debug!(
            logger,
            "Custom cloud configuration not set. Using default cloud {}",
            PUBLIC_CLOUD_NAME
        );
        return CloudEnvironment::public();
    }

    match CloudEnvironment::try_from_config(config) {
        Ok(environment) => {
            crate::log_debug!(logger, "Using custom azure cloud configuration: {:?}", environment);
            environment
        }
        Err(e) => {
            crate::log_warn!(
                logger,
                "Invalid custom cloud configuration ({}). Using default cloud {}",
                e,
                PUBLIC_CLOUD_NAME
            );
            CloudEnvironment::public()
        }
    }
}
