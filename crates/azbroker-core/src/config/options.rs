//! Connection options
//!
//! Every option is independently optional. Values come from (lowest to
//! highest priority) built-in defaults, `AZURE_*` environment variables or a
//! YAML file, and explicit overrides merged with [`ConnectionOptions::merge`].

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::traits::{ConfigError, ConfigResult};

/// Default port of the host-local managed identity endpoint
pub const DEFAULT_MSI_PORT: &str = "50342";

/// Default API profile name
pub const DEFAULT_API_PROFILE: &str = "Latest";

/// Option name -> environment variable it defaults from
const ENV_VARS: &[(&str, &str)] = &[
    ("tenant_id", "AZURE_TENANT_ID"),
    ("client_id", "AZURE_CLIENT_ID"),
    ("client_secret", "AZURE_CLIENT_SECRET"),
    ("subscription_id", "AZURE_SUBSCRIPTION_ID"),
    ("msi_port", "AZURE_MSI_PORT"),
    ("api_profile", "AZURE_API_PROFILE"),
    ("credentials_file", "AZURE_CRED_FILE"),
    ("cloud_name", "AZURE_CLOUD_NAME"),
    ("cloud_portal_url", "AZURE_CLOUD_PORTAL_URL"),
    ("cloud_publishing_profile_url", "AZURE_CLOUD_PUBLISHING_PROFILE_URL"),
    ("cloud_management_endpoint_url", "AZURE_CLOUD_MANAGEMENT_ENDPOINT_URL"),
    ("cloud_resource_management_url", "AZURE_CLOUD_RESOURCE_MANAGEMENT_URL"),
    ("cloud_sql_management_endpoint_url", "AZURE_CLOUD_SQL_MANAGEMENT_ENDPOINT_URL"),
    ("cloud_sql_server_hostname_suffix", "AZURE_CLOUD_SQL_SERVER_HOSTNAME_SUFFIX"),
    ("cloud_gallery_endpoint_url", "AZURE_CLOUD_GALLERY_ENDPOINT_URL"),
    ("cloud_ad_endpoint_url", "AZURE_CLOUD_AD_ENDPOINT_URL"),
    ("cloud_ad_resource_id", "AZURE_CLOUD_AD_RESOURCE_ID"),
    ("cloud_ad_vault_resource_id", "AZURE_CLOUD_AD_VAULT_RESOURCE_ID"),
    ("cloud_ad_graph_resource_id", "AZURE_CLOUD_AD_GRAPH_RESOURCE_ID"),
    ("cloud_api_version", "AZURE_CLOUD_GRAPH_API_VERSION"),
    ("cloud_storage_endpoint_suffix", "AZURE_CLOUD_STORAGE_ENDPOINT_SUFFIX"),
    ("cloud_key_vault_dns_suffix", "AZURE_CLOUD_KEY_VAULT_DNS_SUFFIX"),
    ("cloud_datalake_store_fs_endpoint_suffix", "AZURE_CLOUD_DATALAKE_STORE_FS_ENDPOINT_SUFFIX"),
    (
        "cloud_datalake_analytics_catalog_and_job_endpoint_suffix",
        "AZURE_CLOUD_DATALAKE_ANALYTICS_CATALOG_AND_JOB_ENDPOINT_SUFFIX",
    ),
];

/// Resolved configuration of one connection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionOptions {
    /// Host part of a `azure://<subscription_id>` connection URI
    pub host: Option<String>,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub subscription_id: Option<String>,
    /// Port of the local managed identity endpoint, kept as given
    pub msi_port: Option<String>,
    pub api_profile: Option<String>,
    /// File holding service principal secrets per subscription
    pub credentials_file: Option<String>,

    pub cloud_name: Option<String>,
    pub cloud_portal_url: Option<String>,
    pub cloud_publishing_profile_url: Option<String>,
    pub cloud_management_endpoint_url: Option<String>,
    #[serde(alias = "cloud_resoruce_management_url")]
    pub cloud_resource_management_url: Option<String>,
    pub cloud_sql_management_endpoint_url: Option<String>,
    pub cloud_sql_server_hostname_suffix: Option<String>,
    pub cloud_gallery_endpoint_url: Option<String>,
    pub cloud_ad_endpoint_url: Option<String>,
    pub cloud_ad_resource_id: Option<String>,
    /// Token audience used for the vault client
    pub cloud_ad_vault_resource_id: Option<String>,
    pub cloud_ad_graph_resource_id: Option<String>,
    /// Directory graph API version of the custom cloud
    pub cloud_api_version: Option<String>,
    pub cloud_storage_endpoint_suffix: Option<String>,
    pub cloud_key_vault_dns_suffix: Option<String>,
    pub cloud_datalake_store_fs_endpoint_suffix: Option<String>,
    pub cloud_datalake_analytics_catalog_and_job_endpoint_suffix: Option<String>,
}

impl ConnectionOptions {
    /// Options with the built-in defaults and nothing else
    pub fn new() -> Self {
        Self {
            msi_port: Some(DEFAULT_MSI_PORT.to_string()),
            api_profile: Some(DEFAULT_API_PROFILE.to_string()),
            ..Default::default()
        }
    }

    /// Built-in defaults overlaid with the `AZURE_*` environment variables
    pub fn from_env() -> Self {
        let mut options = Self::new();
        for (field, var) in ENV_VARS {
            if let Ok(value) = env::var(var) {
                options.set_field(field, value);
            }
        }
        options
    }

    /// Load options from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse options from a YAML document; missing keys take the defaults
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let parsed: ConnectionOptions = serde_yaml::from_str(yaml)
            .map_err(|e| ConfigError::Other(format!("Failed to parse YAML: {}", e)))?;
        let mut options = Self::new();
        options.merge(parsed);
        Ok(options)
    }

    /// Merge explicit overrides: fields present in `other` win
    pub fn merge(&mut self, other: ConnectionOptions) {
        for field in Self::field_names() {
            if let Some(value) = other.field(field).cloned() {
                self.set_field(field, value);
            }
        }
    }

    /// Merge a `field name -> value` map, ignoring unknown keys and empty values
    pub fn merge_fields(&mut self, fields: &HashMap<String, String>) {
        for (key, value) in fields {
            self.set_field(key, value.clone());
        }
    }

    /// Set a field by name. Returns false for unknown names or empty values.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() {
            return false;
        }
        match self.field_mut(name) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    /// Read a field by name
    pub fn field(&self, name: &str) -> Option<&String> {
        let value = match name {
            "host" => &self.host,
            "tenant_id" => &self.tenant_id,
            "client_id" => &self.client_id,
            "client_secret" => &self.client_secret,
            "subscription_id" => &self.subscription_id,
            "msi_port" => &self.msi_port,
            "api_profile" => &self.api_profile,
            "credentials_file" => &self.credentials_file,
            "cloud_name" => &self.cloud_name,
            "cloud_portal_url" => &self.cloud_portal_url,
            "cloud_publishing_profile_url" => &self.cloud_publishing_profile_url,
            "cloud_management_endpoint_url" => &self.cloud_management_endpoint_url,
            "cloud_resource_management_url" | "cloud_resoruce_management_url" => {
                &self.cloud_resource_management_url
            }
            "cloud_sql_management_endpoint_url" => &self.cloud_sql_management_endpoint_url,
            "cloud_sql_server_hostname_suffix" => &self.cloud_sql_server_hostname_suffix,
            "cloud_gallery_endpoint_url" => &self.cloud_gallery_endpoint_url,
            "cloud_ad_endpoint_url" => &self.cloud_ad_endpoint_url,
            "cloud_ad_resource_id" => &self.cloud_ad_resource_id,
            "cloud_ad_vault_resource_id" => &self.cloud_ad_vault_resource_id,
            "cloud_ad_graph_resource_id" => &self.cloud_ad_graph_resource_id,
            "cloud_api_version" => &self.cloud_api_version,
            "cloud_storage_endpoint_suffix" => &self.cloud_storage_endpoint_suffix,
            "cloud_key_vault_dns_suffix" => &self.cloud_key_vault_dns_suffix,
            "cloud_datalake_store_fs_endpoint_suffix" => &self.cloud_datalake_store_fs_endpoint_suffix,
            "cloud_datalake_analytics_catalog_and_job_endpoint_suffix" => {
                &self.cloud_datalake_analytics_catalog_and_job_endpoint_suffix
            }
            _ => return None,
        };
        value.as_ref()
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        let slot = match name {
            "host" => &mut self.host,
            "tenant_id" => &mut self.tenant_id,
            "client_id" => &mut self.client_id,
            "client_secret" => &mut self.client_secret,
            "subscription_id" => &mut self.subscription_id,
            "msi_port" => &mut self.msi_port,
            "api_profile" => &mut self.api_profile,
            "credentials_file" => &mut self.credentials_file,
            "cloud_name" => &mut self.cloud_name,
            "cloud_portal_url" => &mut self.cloud_portal_url,
            "cloud_publishing_profile_url" => &mut self.cloud_publishing_profile_url,
            "cloud_management_endpoint_url" => &mut self.cloud_management_endpoint_url,
            "cloud_resource_management_url" | "cloud_resoruce_management_url" => {
                &mut self.cloud_resource_management_url
            }
            "cloud_sql_management_endpoint_url" => &mut self.cloud_sql_management_endpoint_url,
            "cloud_sql_server_hostname_suffix" => &mut self.cloud_sql_server_hostname_suffix,
            "cloud_gallery_endpoint_url" => &mut self.cloud_gallery_endpoint_url,
            "cloud_ad_endpoint_url" => &mut self.cloud_ad_endpoint_url,
            "cloud_ad_resource_id" => &mut self.cloud_ad_resource_id,
            "cloud_ad_vault_resource_id" => &mut self.cloud_ad_vault_resource_id,
            "cloud_ad_graph_resource_id" => &mut self.cloud_ad_graph_resource_id,
            "cloud_api_version" => &mut self.cloud_api_version,
            "cloud_storage_endpoint_suffix" => &mut self.cloud_storage_endpoint_suffix,
            "cloud_key_vault_dns_suffix" => &mut self.cloud_key_vault_dns_suffix,
            "cloud_datalake_store_fs_endpoint_suffix" => {
                &mut self.cloud_datalake_store_fs_endpoint_suffix
            }
            "cloud_datalake_analytics_catalog_and_job_endpoint_suffix" => {
                &mut self.cloud_datalake_analytics_catalog_and_job_endpoint_suffix
            }
            _ => return None,
        };
        Some(slot)
    }

    fn field_names() -> impl Iterator<Item = &'static str> {
        std::iter::once("host").chain(ENV_VARS.iter().map(|(field, _)| *field))
    }

    /// The subscription id, with a non-empty connection-URI host taking precedence
    pub fn effective_subscription_id(&self) -> Option<&str> {
        self.host
            .as_deref()
            .filter(|h| !h.is_empty())
            .or(self.subscription_id.as_deref())
    }

    /// Managed identity port as configured, defaulting to 50342
    pub fn msi_port(&self) -> &str {
        self.msi_port.as_deref().unwrap_or(DEFAULT_MSI_PORT)
    }

    /// API profile name, defaulting to `Latest`
    pub fn api_profile(&self) -> &str {
        self.api_profile.as_deref().unwrap_or(DEFAULT_API_PROFILE)
    }

    /// Whether any custom cloud endpoint field carries a value
    pub fn has_custom_cloud(&self) -> bool {
        Self::field_names()
            .filter(|f| f.starts_with("cloud_") && *f != "cloud_ad_vault_resource_id")
            .any(|f| self.field(f).map_or(false, |v| !v.is_empty()))
    }

    // ========== BUILDER SETTERS ==========

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn with_subscription_id(mut self, subscription_id: impl Into<String>) -> Self {
        self.subscription_id = Some(subscription_id.into());
        self
    }

    pub fn with_msi_port(mut self, port: impl Into<String>) -> Self {
        self.msi_port = Some(port.into());
        self
    }

    pub fn with_api_profile(mut self, profile: impl Into<String>) -> Self {
        self.api_profile = Some(profile.into());
        self
    }

    pub fn with_credentials_file(mut self, path: impl Into<String>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    pub fn with_cloud_name(mut self, name: impl Into<String>) -> Self {
        self.cloud_name = Some(name.into());
        self
    }

    pub fn with_cloud_portal_url(mut self, url: impl Into<String>) -> Self {
        self.cloud_portal_url = Some(url.into());
        self
    }

    pub fn with_cloud_publishing_profile_url(mut self, url: impl Into<String>) -> Self {
        self.cloud_publishing_profile_url = Some(url.into());
        self
    }

    pub fn with_cloud_management_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.cloud_management_endpoint_url = Some(url.into());
        self
    }

    pub fn with_cloud_resource_management_url(mut self, url: impl Into<String>) -> Self {
        self.cloud_resource_management_url = Some(url.into());
        self
    }

    pub fn with_cloud_sql_management_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.cloud_sql_management_endpoint_url = Some(url.into());
        self
    }

    pub fn with_cloud_sql_server_hostname_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.cloud_sql_server_hostname_suffix = Some(suffix.into());
        self
    }

    pub fn with_cloud_gallery_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.cloud_gallery_endpoint_url = Some(url.into());
        self
    }

    pub fn with_cloud_ad_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.cloud_ad_endpoint_url = Some(url.into());
        self
    }

    pub fn with_cloud_ad_resource_id(mut self, id: impl Into<String>) -> Self {
        self.cloud_ad_resource_id = Some(id.into());
        self
    }

    pub fn with_cloud_ad_vault_resource_id(mut self, id: impl Into<String>) -> Self {
        self.cloud_ad_vault_resource_id = Some(id.into());
        self
    }

    pub fn with_cloud_ad_graph_resource_id(mut self, id: impl Into<String>) -> Self {
        self.cloud_ad_graph_resource_id = Some(id.into());
        self
    }

    pub fn with_cloud_api_version(mut self, version: impl Into<String>) -> Self {
        self.cloud_api_version = Some(version.into());
        self
    }

    pub fn with_cloud_storage_endpoint_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.cloud_storage_endpoint_suffix = Some(suffix.into());
        self
    }

    pub fn with_cloud_key_vault_dns_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.cloud_key_vault_dns_suffix = Some(suffix.into());
        self
    }

    pub fn with_cloud_datalake_store_fs_endpoint_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.cloud_datalake_store_fs_endpoint_suffix = Some(suffix.into());
        self
    }

    pub fn with_cloud_datalake_analytics_catalog_and_job_endpoint_suffix(
        mut self,
        suffix: impl Into<String>,
    ) -> Self {
        self.cloud_datalake_analytics_catalog_and_job_endpoint_suffix = Some(suffix.into());
        self
    }
}
