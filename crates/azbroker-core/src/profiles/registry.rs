//! API profile registry
//!
//! Maps `(resource family, profile name)` to the API version a client speaks
//! and the constructor that builds it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::error::{ProfileError, ProfileResult};
use super::family::ResourceFamily;
use crate::auth::CredentialBundle;
use crate::clients::{ClientResult, GraphClient, ManagementClient, SharedClient, VaultClient};
use crate::cloud::CloudEnvironment;

/// A named set of API versions for one resource family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiProfile {
    pub name: String,
    pub family: ResourceFamily,
    /// API version the family's client sends
    pub default_api_version: String,
}

impl ApiProfile {
    pub fn new(name: impl Into<String>, family: ResourceFamily, default_api_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            family,
            default_api_version: default_api_version.into(),
        }
    }
}

/// Everything a client constructor receives
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub family: ResourceFamily,
    pub profile: ApiProfile,
    /// Credential view already scoped for this family
    pub credentials: CredentialBundle,
    pub environment: Arc<CloudEnvironment>,
    pub base_url: String,
    /// Only set for the vault family
    pub vault_name: Option<String>,
}

/// Constructor of a client for one profile
pub type ClientFactory = Arc<dyn Fn(ClientConfig) -> ClientResult<SharedClient> + Send + Sync>;

/// A profile together with its constructor
#[derive(Clone)]
pub struct RegisteredProfile {
    pub profile: ApiProfile,
    pub factory: ClientFactory,
}

impl fmt::Debug for RegisteredProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredProfile")
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

/// Built-in profiles: `(profile, resource management version, vault version)`
const BUILTIN_PROFILES: &[(&str, &str, &str)] = &[
    ("Latest", "2021-04-01", "2022-07-01"),
    ("V2017_03_09", "2016-02-01", "2016-10-01"),
    ("V2018_03_01", "2018-02-01", "2016-10-01"),
    ("V2019_03_01_Hybrid", "2018-05-01", "2016-10-01"),
    ("V2020_09_01_Hybrid", "2019-10-01", "2019-09-01"),
];

const GRAPH_API_VERSION: &str = "1.6";

/// Registry of API profiles per resource family
pub struct ProfileRegistry {
    profiles: RwLock<HashMap<(ResourceFamily, String), RegisteredProfile>>,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProfileRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self
            .profiles
            .read()
            .values()
            .map(|p| format!("{}/{}", p.profile.family, p.profile.name))
            .collect();
        names.sort();
        f.debug_struct("ProfileRegistry").field("profiles", &names).finish()
    }
}

fn key(family: ResourceFamily, name: &str) -> (ResourceFamily, String) {
    (family, name.to_lowercase())
}

impl ProfileRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
        }
    }

    /// Registry holding the HTTP clients for every built-in profile
    pub fn builtin() -> Self {
        let registry = Self::new();

        for (name, resources_version, vault_version) in BUILTIN_PROFILES {
            registry.register(
                ApiProfile::new(*name, ResourceFamily::ResourceManagement, *resources_version),
                Arc::new(ManagementClient::factory),
            );
            registry.register(
                ApiProfile::new(*name, ResourceFamily::Vault, *vault_version),
                Arc::new(VaultClient::factory),
            );
        }
        registry.register(
            ApiProfile::new("Latest", ResourceFamily::Identity, GRAPH_API_VERSION),
            Arc::new(GraphClient::factory),
        );

        registry
    }

    /// Register a profile, replacing any with the same family and name
    pub fn register(&self, profile: ApiProfile, factory: ClientFactory) {
        let key = key(profile.family, &profile.name);
        self.profiles.write().insert(key, RegisteredProfile { profile, factory });
    }

    /// Remove a profile
    pub fn unregister(&self, family: ResourceFamily, name: &str) -> Option<RegisteredProfile> {
        self.profiles.write().remove(&key(family, name))
    }

    /// Look up a profile by family and name; names match ignoring case
    pub fn lookup(&self, family: ResourceFamily, name: &str) -> ProfileResult<RegisteredProfile> {
        if let Some(found) = self.profiles.read().get(&key(family, name)) {
            return Ok(found.clone());
        }

        Err(ProfileError::NotFound {
            profile: name.to_string(),
            family,
            available: self.profile_names(family),
        })
    }

    /// Names of the profiles registered for a family, sorted
    pub fn profile_names(&self, family: ResourceFamily) -> Vec<String> {
        let mut names: Vec<String> = self
            .profiles
            .read()
            .values()
            .filter(|p| p.profile.family == family)
            .map(|p| p.profile.name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn contains(&self, family: ResourceFamily, name: &str) -> bool {
        self.profiles.read().contains_key(&key(family, name))
    }
}

/// Process-wide registry, seeded with the built-in profiles
static GLOBAL_REGISTRY: Lazy<Arc<ProfileRegistry>> = Lazy::new(|| Arc::new(ProfileRegistry::builtin()));

/// Get the process-wide profile registry
pub fn global_profile_registry() -> Arc<ProfileRegistry> {
    Arc::clone(&GLOBAL_REGISTRY)
}

/// Register a profile with the process-wide registry
///
/// Connections built afterwards (and existing ones that have not yet cached
/// a client for the family) can use it.
pub fn register_api_profile(profile: ApiProfile, factory: ClientFactory) {
    GLOBAL_REGISTRY.register(profile, factory);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::MockControlPlane;

    #[test]
    fn test_builtin_profiles() {
        let registry = ProfileRegistry::builtin();

        assert_eq!(
            registry.profile_names(ResourceFamily::ResourceManagement),
            vec!["Latest", "V2017_03_09", "V2018_03_01", "V2019_03_01_Hybrid", "V2020_09_01_Hybrid"]
        );
        assert_eq!(registry.profile_names(ResourceFamily::Identity), vec!["Latest"]);

        let latest = registry.lookup(ResourceFamily::ResourceManagement, "latest").unwrap();
        assert_eq!(latest.profile.name, "Latest");
        assert_eq!(latest.profile.default_api_version, "2021-04-01");
    }

    #[test]
    fn test_unknown_profile_lists_available() {
        let registry = ProfileRegistry::builtin();
        let err = registry
            .lookup(ResourceFamily::Identity, "V2018_03_01")
            .unwrap_err();

        match &err {
            ProfileError::NotFound { profile, family, available } => {
                assert_eq!(profile, "V2018_03_01");
                assert_eq!(*family, ResourceFamily::Identity);
                assert_eq!(available, &vec!["Latest".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("Latest"));
    }

    #[test]
    fn test_register_and_unregister() {
        let registry = ProfileRegistry::new();
        let plane = MockControlPlane::new();

        registry.register(
            ApiProfile::new("Custom", ResourceFamily::Vault, "2020-01-01"),
            plane.factory(),
        );
        assert!(registry.contains(ResourceFamily::Vault, "custom"));
        assert!(!registry.contains(ResourceFamily::ResourceManagement, "Custom"));

        let removed = registry.unregister(ResourceFamily::Vault, "Custom").unwrap();
        assert_eq!(removed.profile.default_api_version, "2020-01-01");
        assert!(registry.profile_names(ResourceFamily::Vault).is_empty());
    }

    #[test]
    fn test_global_registry_accepts_new_profiles() {
        register_api_profile(
            ApiProfile::new("GlobalTestProfile", ResourceFamily::Identity, "1.6"),
            MockControlPlane::new().factory(),
        );
        assert!(global_profile_registry().contains(ResourceFamily::Identity, "GlobalTestProfile"));
        assert!(global_profile_registry().contains(ResourceFamily::ResourceManagement, "Latest"));
    }
}
