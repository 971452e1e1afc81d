//! Resource management client

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use super::error::{ClientError, ClientResult};
use super::traits::{ApiClient, ProviderOperations, ProviderRecord, SharedClient};
use crate::auth::CredentialBundle;
use crate::cloud::CloudEnvironment;
use crate::profiles::{ApiProfile, ClientConfig, ResourceFamily};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the resource manager endpoint of a cloud
#[derive(Debug)]
pub struct ManagementClient {
    profile: ApiProfile,
    base_url: String,
    credentials: CredentialBundle,
    environment: Arc<CloudEnvironment>,
    http: reqwest::blocking::Client,
}

impl ManagementClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            profile: config.profile,
            base_url: config.base_url,
            credentials: config.credentials,
            environment: config.environment,
            http,
        })
    }

    /// Constructor registered for every resource management profile
    pub fn factory(config: ClientConfig) -> ClientResult<SharedClient> {
        Ok(Arc::new(Self::new(config)?))
    }

    pub fn environment(&self) -> &CloudEnvironment {
        &self.environment
    }

    /// Provider registration URL for a namespace
    pub fn provider_url(&self, namespace: &str) -> ClientResult<String> {
        let subscription_id = self
            .credentials
            .subscription_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ClientError::Configuration("subscription_id is required for provider lookups".to_string()))?;

        Ok(format!(
            "{}/subscriptions/{}/providers/{}",
            self.base_url.trim_end_matches('/'),
            subscription_id,
            namespace
        ))
    }
}

impl ApiClient for ManagementClient {
    fn family(&self) -> ResourceFamily {
        ResourceFamily::ResourceManagement
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
        Some(self)
    }
}

impl ProviderOperations for ManagementClient {
    fn get_provider(&self, namespace: &str) -> ClientResult<ProviderRecord> {
        let url = self.provider_url(namespace)?;
        let authorization = self.credentials.credentials.authorization_header()?;

        let response = self
            .http
            .get(&url)
            .header("Authorization", authorization)
            .query(&[("api-version", self.profile.default_api_version.as_str())])
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(ClientError::operation(status.as_u16(), body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}
