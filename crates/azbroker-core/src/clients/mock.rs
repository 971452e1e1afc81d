//! Mock client for testing
//!
//! Serves provider records from memory and counts lookups, so version
//! negotiation and caching can be tested without a control plane.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::error::{ClientError, ClientResult};
use super::traits::{ApiClient, ProviderOperations, ProviderRecord, ProviderResourceType, SharedClient};
use crate::auth::{AuthError, CredentialBundle};
use crate::profiles::{ApiProfile, ClientConfig, ClientFactory, ResourceFamily};

/// Provider records a mock control plane knows about
#[derive(Debug, Clone, Default)]
pub struct MockControlPlane {
    providers: HashMap<String, ProviderRecord>,
    lookups: Arc<AtomicUsize>,
    constructed: Arc<AtomicUsize>,
    token_rejected: bool,
}

impl MockControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider namespace with `(resource type, versions)` entries
    pub fn with_provider(mut self, namespace: &str, types: &[(&str, &[&str])]) -> Self {
        let record = ProviderRecord {
            id: Some(format!("/providers/{}", namespace)),
            namespace: namespace.to_string(),
            registration_state: Some("Registered".to_string()),
            resource_types: types
                .iter()
                .map(|(resource_type, versions)| ProviderResourceType {
                    resource_type: resource_type.to_string(),
                    locations: Vec::new(),
                    api_versions: versions.iter().map(|v| v.to_string()).collect(),
                })
                .collect(),
        };
        self.providers.insert(namespace.to_lowercase(), record);
        self
    }

    /// Fail every lookup as if the directory refused to issue a token
    pub fn rejecting_tokens(mut self) -> Self {
        self.token_rejected = true;
        self
    }

    /// Number of provider lookups served so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Number of clients built by `factory`
    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }

    /// Constructor producing mock clients backed by this control plane
    pub fn factory(&self) -> ClientFactory {
        let plane = self.clone();
        Arc::new(move |config: ClientConfig| -> ClientResult<SharedClient> {
            plane.constructed.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(MockClient::new(config, plane.clone())))
        })
    }

    fn lookup(&self, namespace: &str) -> ClientResult<ProviderRecord> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.token_rejected {
            return Err(ClientError::Auth(AuthError::TokenRequest {
                endpoint: "mock".to_string(),
                status: 401,
                message: "invalid_client".to_string(),
            }));
        }
        self.providers.get(&namespace.to_lowercase()).cloned().ok_or_else(|| {
            ClientError::operation(404, format!("The resource namespace '{}' is invalid.", namespace))
        })
    }
}

/// Client answering from a `MockControlPlane`
#[derive(Debug)]
pub struct MockClient {
    family: ResourceFamily,
    profile: ApiProfile,
    base_url: String,
    credentials: CredentialBundle,
    vault_name: Option<String>,
    plane: MockControlPlane,
}

impl MockClient {
    pub fn new(config: ClientConfig, plane: MockControlPlane) -> Self {
        Self {
            family: config.family,
            profile: config.profile,
            base_url: config.base_url,
            credentials: config.credentials,
            vault_name: config.vault_name,
            plane,
        }
    }

    pub fn vault_name(&self) -> Option<&str> {
        self.vault_name.as_deref()
    }
}

impl ApiClient for MockClient {
    fn family(&self) -> ResourceFamily {
        self.family
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

    fn providers(&self) -> Option<&dyn ProviderOperations> {
        match self.family {
            ResourceFamily::ResourceManagement => Some(self),
            _ => None,
        }
    }
}

impl ProviderOperations for MockClient {
    fn get_provider(&self, namespace: &str) -> ClientResult<ProviderRecord> {
        self.plane.lookup(namespace)
    }
}
