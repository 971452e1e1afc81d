//! Connection construction

use std::sync::Arc;

use parking_lot::Mutex;

use super::connection::Connection;
use super::error::ConnectionResult;
use super::state::ConnectionState;
use crate::auth::{CredentialResolver, EndpointProbe, TcpProbe};
use crate::cloud::{resolve_environment, CloudEndpointConfig};
use crate::config::{ConnectionOptions, CredentialSource, FileCredentials};
use crate::logging::{SharedLogger, TracingLogger};
use crate::profiles::{global_profile_registry, ProfileRegistry};
use crate::log_debug;

/// Builder for a `Connection`
///
/// Every collaborator has a default: `TracingLogger`, `FileCredentials`,
/// `TcpProbe` and the process-wide profile registry.
#[derive(Default)]
pub struct ConnectionBuilder {
    options: ConnectionOptions,
    logger: Option<SharedLogger>,
    credential_source: Option<Arc<dyn CredentialSource>>,
    probe: Option<Arc<dyn EndpointProbe>>,
    profile_registry: Option<Arc<ProfileRegistry>>,
}

impl ConnectionBuilder {
    pub fn new() -> Self {
        Self {
            options: ConnectionOptions::new(),
            ..Default::default()
        }
    }

    pub fn options(mut self, options: ConnectionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn logger(mut self, logger: SharedLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn credential_source(mut self, source: Arc<dyn CredentialSource>) -> Self {
        self.credential_source = Some(source);
        self
    }

    pub fn probe(mut self, probe: Arc<dyn EndpointProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn profile_registry(mut self, registry: Arc<ProfileRegistry>) -> Self {
        self.profile_registry = Some(registry);
        self
    }

    /// Resolve the cloud and the credentials, then build the connection
    ///
    /// Fails only when no usable credentials can be assembled.
    pub fn build(self) -> ConnectionResult<Connection> {
        let logger: SharedLogger = self.logger.unwrap_or_else(|| Arc::new(TracingLogger::new()));
        let source = self
            .credential_source
            .unwrap_or_else(|| Arc::new(FileCredentials::new()));
        let probe = self.probe.unwrap_or_else(|| Arc::new(TcpProbe::new()));
        let profiles = self.profile_registry.unwrap_or_else(global_profile_registry);

        let mut options = self.options;

        // azure://<subscription_id>
        options.subscription_id = options.effective_subscription_id().map(str::to_string);

        let environment = resolve_environment(&CloudEndpointConfig::from(&options), logger.as_ref());
        log_debug!(logger, "Using cloud environment {}", environment.name);

        let resolver = CredentialResolver::new(source, probe, Arc::clone(&logger));
        let resolved = resolver.resolve(&mut options, &environment)?;

        Ok(Connection {
            options,
            environment: Arc::new(environment),
            strategy: resolved.strategy,
            credentials: resolved.bundle,
            profiles,
            logger,
            state: Mutex::new(ConnectionState::new()),
        })
    }
}
