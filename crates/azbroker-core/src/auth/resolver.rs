//! Credential resolution
//!
//! Picks one authentication strategy per connection, in this order:
//! 1. Explicit client id and secret: service principal, no probing
//! 2. Neither present: merge fields from the credential source
//! 3. Still neither present and the local endpoint answers: managed identity
//! 4. Otherwise: service principal built from whatever the options hold

use std::sync::Arc;

use super::credentials::{CredentialBundle, TokenCredentials};
use super::managed_identity::set_msi_vm_flag;
use super::probe::EndpointProbe;
use super::strategy::AuthStrategy;
use super::traits::AuthResult;
use crate::cloud::{ActiveDirectorySettings, CloudEnvironment};
use crate::config::{ConnectionOptions, CredentialSource};
use crate::logging::SharedLogger;
use crate::{log_debug, log_info, log_warn};

/// Output of credential resolution
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    pub strategy: AuthStrategy,
    pub bundle: CredentialBundle,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().map_or(false, |v| !v.is_empty())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

/// Resolves the authentication strategy for a connection
pub struct CredentialResolver {
    source: Arc<dyn CredentialSource>,
    probe: Arc<dyn EndpointProbe>,
    logger: SharedLogger,
}

impl CredentialResolver {
    pub fn new(source: Arc<dyn CredentialSource>, probe: Arc<dyn EndpointProbe>, logger: SharedLogger) -> Self {
        Self { source, probe, logger }
    }

    /// Resolve credentials, merging source fields into `options` when used
    pub fn resolve(
        &self,
        options: &mut ConnectionOptions,
        environment: &CloudEnvironment,
    ) -> AuthResult<ResolvedCredentials> {
        let strategy = self.select_strategy(options);
        log_info!(self.logger, "Authenticating with {:?}", strategy);

        let settings = ActiveDirectorySettings::from_environment(environment);
        let provider = strategy.token_provider(&settings)?;

        let bundle = CredentialBundle {
            credentials: TokenCredentials::new(provider),
            subscription_id: options.effective_subscription_id().map(str::to_string),
            tenant_id: non_empty(&options.tenant_id),
            client_id: non_empty(&options.client_id),
            client_secret: non_empty(&options.client_secret),
            active_directory_settings: settings,
            base_url: None,
            token_audience: None,
        };

        Ok(ResolvedCredentials { strategy, bundle })
    }

    fn select_strategy(&self, options: &mut ConnectionOptions) -> AuthStrategy {
        let mut file_source = None;

        if !present(&options.client_id) && !present(&options.client_secret) {
            file_source = self.merge_from_source(options);
        }

        if !present(&options.client_id) && !present(&options.client_secret) {
            if let Some(port) = self.probe_managed_identity(options) {
                set_msi_vm_flag();
                return AuthStrategy::ManagedIdentity { port };
            }
        }

        let tenant_id = options.tenant_id.clone().unwrap_or_default();
        let client_id = options.client_id.clone().unwrap_or_default();
        let client_secret = options.client_secret.clone().unwrap_or_default();

        match file_source {
            Some(source) => AuthStrategy::CredentialsFile {
                source,
                tenant_id,
                client_id,
                client_secret,
            },
            None => AuthStrategy::ServicePrincipal {
                tenant_id,
                client_id,
                client_secret,
            },
        }
    }

    /// Merge source fields into the options
    ///
    /// Returns the source description when it supplied client credentials.
    /// Read failures are logged and treated as an empty source.
    fn merge_from_source(&self, options: &mut ConnectionOptions) -> Option<String> {
        let fields = match self.source.load(options) {
            Ok(fields) => fields,
            Err(e) => {
                log_warn!(self.logger, "Credential source '{}' unreadable: {}", self.source.name(), e);
                return None;
            }
        };
        if fields.is_empty() {
            log_debug!(self.logger, "Credential source '{}' had nothing to add", self.source.name());
            return None;
        }

        let description = self.source.describe(options);
        options.merge_fields(&fields);

        let supplied_client = ["client_id", "client_secret"]
            .iter()
            .any(|key| fields.get(*key).map_or(false, |v| !v.is_empty()));
        if supplied_client {
            log_debug!(self.logger, "Loaded client credentials from {}", description);
            Some(description)
        } else {
            None
        }
    }

    fn probe_managed_identity(&self, options: &ConnectionOptions) -> Option<u16> {
        let port = match options.msi_port().parse::<u16>() {
            Ok(port) => port,
            Err(_) => {
                log_debug!(self.logger, "msi_port {:?} is not a port; skipping probe", options.msi_port());
                return None;
            }
        };

        if self.probe.is_reachable(port) {
            Some(port)
        } else {
            log_debug!(self.logger, "No managed identity endpoint on localhost:{}", port);
            None
        }
    }
}
