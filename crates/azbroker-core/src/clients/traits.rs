//! Client traits and control-plane records

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::ClientResult;
use crate::auth::CredentialBundle;
use crate::profiles::{ApiProfile, ResourceFamily};

/// Configured handle for one resource family
///
/// Only the operations the connection itself calls are modelled here;
/// callers reach the concrete type through `as_any` for anything else.
pub trait ApiClient: Send + Sync + fmt::Debug {
    fn family(&self) -> ResourceFamily;

    /// API profile the client was built for
    fn profile(&self) -> &ApiProfile;

    /// Service URL every request goes to
    fn base_url(&self) -> &str;

    /// Credential view the client authenticates with
    fn credentials(&self) -> &CredentialBundle;

    fn as_any(&self) -> &dyn Any;

    /// Provider registration lookups, for clients that support them
    fn providers(&self) -> Option<&dyn ProviderOperations> {
        None
    }
}

/// Shared client handle, as stored in a connection's cache
pub type SharedClient = Arc<dyn ApiClient>;

/// Resource provider registration operations
pub trait ProviderOperations: Send + Sync {
    /// Fetch the registration record of a provider namespace
    fn get_provider(&self, namespace: &str) -> ClientResult<ProviderRecord>;
}

/// Registration record of one resource provider namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub namespace: String,
    #[serde(default)]
    pub registration_state: Option<String>,
    #[serde(default)]
    pub resource_types: Vec<ProviderResourceType>,
}

impl ProviderRecord {
    /// Find a resource type declared by this provider, ignoring case
    pub fn find_resource_type(&self, resource_type: &str) -> Option<&ProviderResourceType> {
        self.resource_types
            .iter()
            .find(|t| t.resource_type.eq_ignore_ascii_case(resource_type))
    }
}

/// A resource type and the API versions it supports
///
/// Versions are kept in the order the control plane returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResourceType {
    pub resource_type: String,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub api_versions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPUTE: &str = r#"{
        "id": "/subscriptions/sub/providers/Microsoft.Compute",
        "namespace": "Microsoft.Compute",
        "registrationState": "Registered",
        "resourceTypes": [
            {
                "resourceType": "virtualMachines",
                "locations": ["East US", "West Europe"],
                "apiVersions": ["2023-03-01", "2022-11-01", "2022-08-01"]
            },
            {
                "resourceType": "disks",
                "apiVersions": ["2023-01-02"]
            }
        ]
    }"#;

    #[test]
    fn test_parse_provider_record() {
        let record: ProviderRecord = serde_json::from_str(COMPUTE).unwrap();
        assert_eq!(record.namespace, "Microsoft.Compute");
        assert_eq!(record.registration_state.as_deref(), Some("Registered"));
        assert_eq!(record.resource_types.len(), 2);
        assert!(record.resource_types[1].locations.is_empty());
    }

    #[test]
    fn test_find_resource_type_ignores_case() {
        let record: ProviderRecord = serde_json::from_str(COMPUTE).unwrap();
        let vms = record.find_resource_type("VIRTUALMACHINES").unwrap();
        assert_eq!(vms.api_versions[0], "2023-03-01");
        assert!(record.find_resource_type("virtualMachineScaleSets").is_none());
    }
}
