//! Key vault client

use std::any::Any;
use std::sync::Arc;

use super::error::{ClientError, ClientResult};
use super::traits::{ApiClient, SharedClient};
use crate::auth::CredentialBundle;
use crate::profiles::{ApiProfile, ClientConfig, ResourceFamily};

/// Token audience used when the options name none
pub const DEFAULT_VAULT_RESOURCE: &str = "https://vault.azure.net";

/// Configured handle for one key vault
#[derive(Debug)]
pub struct VaultClient {
    vault_name: String,
    profile: ApiProfile,
    base_url: String,
    credentials: CredentialBundle,
}

impl VaultClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let vault_name = config
            .vault_name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ClientError::Configuration("vault name cannot be empty".to_string()))?;

        Ok(Self {
            vault_name,
            profile: config.profile,
            base_url: config.base_url,
            credentials: config.credentials,
        })
    }

    pub fn factory(config: ClientConfig) -> ClientResult<SharedClient> {
        Ok(Arc::new(Self::new(config)?))
    }

    pub fn vault_name(&self) -> &str {
        &self.vault_name
    }

    pub fn api_version(&self) -> &str {
        &self.profile.default_api_version
    }
}

impl ApiClient for VaultClient {
    fn family(&self) -> ResourceFamily {
        ResourceFamily::Vault
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
