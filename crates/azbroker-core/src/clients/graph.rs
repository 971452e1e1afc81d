//! Directory graph client

use std::any::Any;
use std::sync::Arc;

use super::error::ClientResult;
use super::traits::{ApiClient, SharedClient};
use crate::auth::CredentialBundle;
use crate::profiles::{ApiProfile, ClientConfig, ResourceFamily};

/// Configured handle for the directory graph of a cloud
///
/// Tokens are issued for the graph resource id, which is also the base URL.
#[derive(Debug)]
pub struct GraphClient {
    profile: ApiProfile,
    base_url: String,
    credentials: CredentialBundle,
    api_version: String,
}

impl GraphClient {
    pub fn new(config: ClientConfig) -> Self {
        // A custom cloud may pin its own graph API version
        let api_version = config
            .environment
            .active_directory_graph_api_version
            .clone()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| config.profile.default_api_version.clone());

        Self {
            profile: config.profile,
            base_url: config.base_url,
            credentials: config.credentials,
            api_version,
        }
    }

    pub fn factory(config: ClientConfig) -> ClientResult<SharedClient> {
        Ok(Arc::new(Self::new(config)))
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Tenant the graph requests are made against
    pub fn tenant_id(&self) -> Option<&str> {
        self.credentials.tenant_id.as_deref()
    }
}

impl ApiClient for GraphClient {
    fn family(&self) -> ResourceFamily {
        ResourceFamily::Identity
    }

    fn profile(&self) -> &ApiProfile {
        &self.profile
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn credentials(&self) -> &CredentialBundle {
        &self.credentials
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
