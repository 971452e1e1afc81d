//! Cloud environment descriptors

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConnectionOptions;

/// Name of the built-in public cloud
pub const PUBLIC_CLOUD_NAME: &str = "AzureCloud";

/// Errors raised while building a custom environment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    #[error("{0} is nil or empty")]
    MissingField(&'static str),
}

/// Partial set of endpoint fields supplied by configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloudEndpointConfig {
    pub name: Option<String>,
    pub portal_url: Option<String>,
    pub publishing_profile_url: Option<String>,
    pub management_endpoint_url: Option<String>,
    pub resource_manager_endpoint_url: Option<String>,
    pub sql_management_endpoint_url: Option<String>,
    pub sql_server_hostname_suffix: Option<String>,
    pub gallery_endpoint_url: Option<String>,
    pub active_directory_endpoint_url: Option<String>,
    pub active_directory_resource_id: Option<String>,
    pub active_directory_graph_resource_id: Option<String>,
    pub active_directory_graph_api_version: Option<String>,
    pub storage_endpoint_suffix: Option<String>,
    pub key_vault_dns_suffix: Option<String>,
    pub datalake_store_filesystem_endpoint_suffix: Option<String>,
    pub datalake_analytics_catalog_and_job_endpoint_suffix: Option<String>,
}

impl CloudEndpointConfig {
    /// True when no field carries a non-empty value
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.portal_url,
            &self.publishing_profile_url,
            &self.management_endpoint_url,
            &self.resource_manager_endpoint_url,
            &self.sql_management_endpoint_url,
            &self.sql_server_hostname_suffix,
            &self.gallery_endpoint_url,
            &self.active_directory_endpoint_url,
            &self.active_directory_resource_id,
            &self.active_directory_graph_resource_id,
            &self.active_directory_graph_api_version,
            &self.storage_endpoint_suffix,
            &self.key_vault_dns_suffix,
            &self.datalake_store_filesystem_endpoint_suffix,
            &self.datalake_analytics_catalog_and_job_endpoint_suffix,
        ]
        .iter()
        .all(|field| field.as_deref().map_or(true, str::is_empty))
    }
}

impl From<&ConnectionOptions> for CloudEndpointConfig {
    fn from(options: &ConnectionOptions) -> Self {
        Self {
            name: options.cloud_name.clone(),
            portal_url: options.cloud_portal_url.clone(),
            publishing_profile_url: options.cloud_publishing_profile_url.clone(),
            management_endpoint_url: options.cloud_management_endpoint_url.clone(),
            resource_manager_endpoint_url: options.cloud_resource_management_url.clone(),
            sql_management_endpoint_url: options.cloud_sql_management_endpoint_url.clone(),
            sql_server_hostname_suffix: options.cloud_sql_server_hostname_suffix.clone(),
            gallery_endpoint_url: options.cloud_gallery_endpoint_url.clone(),
            active_directory_endpoint_url: options.cloud_ad_endpoint_url.clone(),
            active_directory_resource_id: options.cloud_ad_resource_id.clone(),
            active_directory_graph_resource_id: options.cloud_ad_graph_resource_id.clone(),
            active_directory_graph_api_version: options.cloud_api_version.clone(),
            storage_endpoint_suffix: options.cloud_storage_endpoint_suffix.clone(),
            key_vault_dns_suffix: options.cloud_key_vault_dns_suffix.clone(),
            datalake_store_filesystem_endpoint_suffix: options
                .cloud_datalake_store_fs_endpoint_suffix
                .clone(),
            datalake_analytics_catalog_and_job_endpoint_suffix: options
                .cloud_datalake_analytics_catalog_and_job_endpoint_suffix
                .clone(),
        }
    }
}

/// Named set of service endpoints of one cloud
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudEnvironment {
    pub name: String,
    pub portal_url: String,
    pub publishing_profile_url: String,
    pub management_endpoint_url: String,
    pub resource_manager_endpoint_url: String,
    pub sql_management_endpoint_url: String,
    pub sql_server_hostname_suffix: String,
    pub gallery_endpoint_url: String,
    pub active_directory_endpoint_url: String,
    pub active_directory_resource_id: String,
    pub active_directory_graph_resource_id: String,
    pub active_directory_graph_api_version: Option<String>,
    pub storage_endpoint_suffix: Option<String>,
    pub key_vault_dns_suffix: Option<String>,
    pub datalake_store_filesystem_endpoint_suffix: Option<String>,
    pub datalake_analytics_catalog_and_job_endpoint_suffix: Option<String>,
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, EnvironmentError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(EnvironmentError::MissingField(field)),
    }
}

impl CloudEnvironment {
    /// The public Azure cloud
    pub fn public() -> Self {
        Self {
            name: PUBLIC_CLOUD_NAME.to_string(),
            portal_url: "https://portal.azure.com".to_string(),
            publishing_profile_url: "https://go.microsoft.com/fwlink/?LinkId=254432".to_string(),
            management_endpoint_url: "https://management.core.windows.net".to_string(),
            resource_manager_endpoint_url: "https://management.azure.com/".to_string(),
            sql_management_endpoint_url: "https://management.core.windows.net:8443/".to_string(),
            sql_server_hostname_suffix: ".database.windows.net".to_string(),
            gallery_endpoint_url: "https://gallery.azure.com/".to_string(),
            active_directory_endpoint_url: "https://login.microsoftonline.com/".to_string(),
            active_directory_resource_id: "https://management.core.windows.net/".to_string(),
            active_directory_graph_resource_id: "https://graph.windows.net/".to_string(),
            active_directory_graph_api_version: Some("2013-04-05".to_string()),
            storage_endpoint_suffix: Some(".core.windows.net".to_string()),
            key_vault_dns_suffix: Some(".vault.azure.net".to_string()),
            datalake_store_filesystem_endpoint_suffix: Some("azuredatalakestore.net".to_string()),
            datalake_analytics_catalog_and_job_endpoint_suffix: Some(
                "azuredatalakeanalytics.net".to_string(),
            ),
        }
    }

    /// Build a descriptor from exactly the supplied fields
    ///
    /// Every URL the control plane and directory need is required; the
    /// suffixes and the graph API version pass through as given.
    pub fn try_from_config(config: &CloudEndpointConfig) -> Result<Self, EnvironmentError> {
        Ok(Self {
            name: required(&config.name, "name")?,
            portal_url: required(&config.portal_url, "portal_url")?,
            publishing_profile_url: required(&config.publishing_profile_url, "publishing_profile_url")?,
            management_endpoint_url: required(&config.management_endpoint_url, "management_endpoint_url")?,
            resource_manager_endpoint_url: required(
                &config.resource_manager_endpoint_url,
                "resource_manager_endpoint_url",
            )?,
            sql_management_endpoint_url: required(
                &config.sql_management_endpoint_url,
                "sql_management_endpoint_url",
            )?,
            sql_server_hostname_suffix: required(
                &config.sql_server_hostname_suffix,
                "sql_server_hostname_suffix",
            )?,
            gallery_endpoint_url: required(&config.gallery_endpoint_url, "gallery_endpoint_url")?,
            active_directory_endpoint_url: required(
                &config.active_directory_endpoint_url,
                "active_directory_endpoint_url",
            )?,
            active_directory_resource_id: required(
                &config.active_directory_resource_id,
                "active_directory_resource_id",
            )?,
            active_directory_graph_resource_id: required(
                &config.active_directory_graph_resource_id,
                "active_directory_graph_resource_id",
            )?,
            active_directory_graph_api_version: config.active_directory_graph_api_version.clone(),
            storage_endpoint_suffix: config.storage_endpoint_suffix.clone(),
            key_vault_dns_suffix: config.key_vault_dns_suffix.clone(),
            datalake_store_filesystem_endpoint_suffix: config
                .datalake_store_filesystem_endpoint_suffix
                .clone(),
            datalake_analytics_catalog_and_job_endpoint_suffix: config
                .datalake_analytics_catalog_and_job_endpoint_suffix
                .clone(),
        })
    }

    pub fn is_public(&self) -> bool {
        self.name == PUBLIC_CLOUD_NAME
    }

    /// Data-plane URL of a key vault in this cloud
    pub fn vault_url(&self, vault_name: &str) -> String {
        format!(
            "https://{}{}",
            vault_name,
            self.key_vault_dns_suffix.as_deref().unwrap_or_default()
        )
    }
}

impl Default for CloudEnvironment {
    fn default() -> Self {
        Self::public()
    }
}
