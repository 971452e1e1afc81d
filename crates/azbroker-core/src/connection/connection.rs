//! Connection to one Azure subscription

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::builder::ConnectionBuilder;
use super::error::{ConnectionError, ConnectionResult};
use super::state::ConnectionState;
use crate::auth::{AuthStrategy, CredentialBundle};
use crate::clients::{ClientError, SharedClient, DEFAULT_VAULT_RESOURCE};
use crate::cloud::CloudEnvironment;
use crate::config::ConnectionOptions;
use crate::logging::SharedLogger;
use crate::profiles::{ApiProfile, ClientConfig, ProfileRegistry, ResourceFamily};
use crate::log_debug;

/// Per-request options for `Connection::get_client`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Required for the vault family
    pub vault_name: Option<String>,
}

impl ClientOptions {
    pub fn vault(name: impl Into<String>) -> Self {
        Self {
            vault_name: Some(name.into()),
        }
    }
}

/// Per-request options for `Connection::get_api_version`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionOptions {
    /// Explicit version; always wins and replaces the cached value
    ///
    /// An empty string counts as absent, so `Some("")` negotiates like `None`
    /// rather than pinning an unusable version.
    pub api_version: Option<String>,
}

impl VersionOptions {
    pub fn pinned(api_version: impl Into<String>) -> Self {
        Self {
            api_version: Some(api_version.into()),
        }
    }
}

/// Platform details reported by a connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub name: String,
    pub families: Vec<String>,
    pub release: String,
}

/// Authenticated connection to one subscription
///
/// Hands out clients per resource family and negotiates API versions per
/// resource type. Both are cached for the lifetime of the connection; the
/// lock guarding them is never held across client construction or remote
/// calls.
pub struct Connection {
    pub(super) options: ConnectionOptions,
    pub(super) environment: Arc<CloudEnvironment>,
    pub(super) strategy: AuthStrategy,
    pub(super) credentials: CredentialBundle,
    pub(super) profiles: Arc<ProfileRegistry>,
    pub(super) logger: SharedLogger,
    pub(super) state: Mutex<ConnectionState>,
}

impl Connection {
    /// Connect with default collaborators
    pub fn new(options: ConnectionOptions) -> ConnectionResult<Self> {
        Self::builder().options(options).build()
    }

    pub fn builder() -> ConnectionBuilder {
        ConnectionBuilder::new()
    }

    // ========== CLIENTS ==========

    /// Client for a resource family, from the cache when possible
    pub fn get_client(&self, family: ResourceFamily, options: &ClientOptions) -> ConnectionResult<SharedClient> {
        let vault_name = options.vault_name.as_deref().filter(|name| !name.is_empty());
        if family == ResourceFamily::Vault && vault_name.is_none() {
            return Err(ConnectionError::Configuration("Vault name cannot be empty".to_string()));
        }

        if let Some(client) = self.state.lock().cached_client(family) {
            return Ok(client);
        }

        let registered = self.profiles.lookup(family, self.options.api_profile())?;
        log_debug!(
            self.logger,
            "Creating {} client with api profile {}",
            family,
            registered.profile.name
        );

        let config = self.client_config(family, registered.profile, vault_name);
        let client = (registered.factory)(config)?;

        Ok(self.state.lock().store_client(family, client))
    }

    /// `get_client` with the family given by name, e.g. `"vault"`
    pub fn get_client_named(&self, family: &str, options: &ClientOptions) -> ConnectionResult<SharedClient> {
        let family: ResourceFamily = family.parse()?;
        self.get_client(family, options)
    }

    fn client_config(
        &self,
        family: ResourceFamily,
        profile: ApiProfile,
        vault_name: Option<&str>,
    ) -> ClientConfig {
        let (base_url, credentials) = match family {
            ResourceFamily::ResourceManagement => {
                let base_url = self.environment.resource_manager_endpoint_url.clone();
                (base_url.clone(), self.credentials.with_base_url(base_url))
            }
            ResourceFamily::Identity => {
                let graph = self.environment.active_directory_graph_resource_id.clone();
                (graph.clone(), self.credentials.scoped(&graph).with_base_url(graph))
            }
            ResourceFamily::Vault => {
                let base_url = self.environment.vault_url(vault_name.unwrap_or_default());
                let audience = self
                    .options
                    .cloud_ad_vault_resource_id
                    .as_deref()
                    .filter(|a| !a.is_empty())
                    .unwrap_or(DEFAULT_VAULT_RESOURCE);
                (base_url.clone(), self.credentials.scoped(audience).with_base_url(base_url))
            }
        };

        ClientConfig {
            family,
            profile,
            credentials,
            environment: Arc::clone(&self.environment),
            base_url,
            vault_name: vault_name.map(str::to_string),
        }
    }

    pub fn enable_cache(&self) {
        self.state.lock().set_cache_enabled(true);
    }

    /// Stop caching clients and drop the ones already cached
    pub fn disable_cache(&self) {
        self.state.lock().set_cache_enabled(false);
    }

    pub fn cache_enabled(&self) -> bool {
        self.state.lock().cache_enabled()
    }

    pub fn cached_client_count(&self) -> usize {
        self.state.lock().cached_client_count()
    }

    // ========== API VERSIONS ==========

    /// API version for a `<namespace>/<type>` resource type
    ///
    /// An explicit version is stored and returned. Otherwise a stored version
    /// is returned, and only on a miss is the provider registration fetched;
    /// its first listed version for the type is used.
    pub fn get_api_version(&self, resource_type: &str, options: &VersionOptions) -> ConnectionResult<String> {
        log_debug!(self.logger, "Fetching api version for resource type {}", resource_type);

        if let Some(version) = options.api_version.as_deref().filter(|v| !v.is_empty()) {
            log_debug!(self.logger, "Using api version {} supplied by options", version);
            self.state.lock().pin_api_version(resource_type, version.to_string());
            return Ok(version.to_string());
        }

        if let Some(version) = self.state.lock().api_version(resource_type) {
            return Ok(version.clone());
        }

        let version = self.negotiate_api_version(resource_type)?;
        Ok(self.state.lock().record_api_version(resource_type, version))
    }

    fn negotiate_api_version(&self, resource_type: &str) -> ConnectionResult<String> {
        let (namespace, type_name) = resource_type.split_once('/').unwrap_or((resource_type, ""));
        let profile = self.options.api_profile().to_string();

        let client = self.get_client(ResourceFamily::ResourceManagement, &ClientOptions::default())?;
        let providers = client.providers().ok_or_else(|| {
            ConnectionError::Configuration(format!(
                "resource management client for profile {} cannot look up providers",
                profile
            ))
        })?;

        // Only a control-plane rejection means the namespace is unknown;
        // auth, transport and configuration failures surface as they are
        let record = providers.get_provider(namespace).map_err(|e| {
            log_debug!(self.logger, "Failed to fetch provider for namespace {}: {}", namespace, e);
            match e {
                ClientError::Operation { .. } => ConnectionError::NamespaceNotFound {
                    namespace: namespace.to_string(),
                    profile: profile.clone(),
                    reason: e.to_string(),
                },
                other => ConnectionError::Client(other),
            }
        })?;

        let versions = record
            .find_resource_type(type_name)
            .map(|t| t.api_versions.as_slice())
            .unwrap_or_default();
        log_debug!(self.logger, "Api versions for {}: {:?}", resource_type, versions);

        // The control plane lists versions newest first
        versions
            .first()
            .cloned()
            .ok_or_else(|| ConnectionError::ResourceTypeNotFound {
                resource_type: type_name.to_string(),
                namespace: namespace.to_string(),
                profile,
            })
    }

    /// Stored version for a resource type, without negotiating
    pub fn cached_api_version(&self, resource_type: &str) -> Option<String> {
        self.state.lock().api_version(resource_type).cloned()
    }

    pub fn cached_api_version_count(&self) -> usize {
        self.state.lock().api_version_count()
    }

    // ========== ACCESSORS ==========

    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    pub fn environment(&self) -> &CloudEnvironment {
        &self.environment
    }

    /// The connection-wide credential bundle; clients receive scoped copies
    pub fn credentials(&self) -> &CredentialBundle {
        &self.credentials
    }

    pub fn strategy(&self) -> &AuthStrategy {
        &self.strategy
    }

    /// Subscription id, falling back to the tenant id
    pub fn unique_identifier(&self) -> Option<&str> {
        self.options
            .subscription_id
            .as_deref()
            .or(self.options.tenant_id.as_deref())
    }

    /// `azure://<subscription_id>`
    pub fn uri(&self) -> String {
        format!("azure://{}", self.options.subscription_id.as_deref().unwrap_or_default())
    }

    pub fn platform(&self) -> PlatformInfo {
        PlatformInfo {
            name: "azure".to_string(),
            families: vec!["cloud".to_string(), "api".to_string()],
            release: format!("azbroker-v{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Managed identity port, if the configured value is a port number
    pub fn msi_port(&self) -> Option<u16> {
        self.options.msi_port().parse().ok()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("uri", &self.uri())
            .field("environment", &self.environment.name)
            .field("strategy", &self.strategy)
            .field("profiles", &self.profiles)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::auth::{EndpointProbe, TokenProviderKind};
    use crate::clients::{ApiClient, ManagementClient, MockClient, MockControlPlane};
    use crate::config::{ConfigResult, CredentialSource};
    use crate::logging::NoOpLogger;

    struct Unreachable;

    impl EndpointProbe for Unreachable {
        fn is_reachable(&self, _port: u16) -> bool {
            false
        }
    }

    struct EmptySource;

    impl CredentialSource for EmptySource {
        fn name(&self) -> &str {
            "empty"
        }

        fn load(&self, _options: &ConnectionOptions) -> ConfigResult<HashMap<String, String>> {
            Ok(HashMap::new())
        }
    }

    fn control_plane() -> MockControlPlane {
        MockControlPlane::new()
            .with_provider(
                "Microsoft.Compute",
                &[
                    ("virtualMachines", &["2023-03-01", "2022-11-01"]),
                    ("retiredThings", &[]),
                ],
            )
            .with_provider("Microsoft.Storage", &[("storageAccounts", &["2023-01-01"])])
    }

    fn registry(plane: &MockControlPlane) -> Arc<ProfileRegistry> {
        let registry = ProfileRegistry::new();
        for family in ResourceFamily::ALL {
            registry.register(ApiProfile::new("Latest", family, "2021-04-01"), plane.factory());
            registry.register(ApiProfile::new("V2020_09_01_Hybrid", family, "2019-10-01"), plane.factory());
        }
        Arc::new(registry)
    }

    fn service_principal() -> ConnectionOptions {
        ConnectionOptions::new()
            .with_tenant_id("tenant")
            .with_client_id("client")
            .with_client_secret("secret")
            .with_subscription_id("sub")
    }

    fn connect(options: ConnectionOptions, plane: &MockControlPlane) -> Connection {
        Connection::builder()
            .options(options)
            .logger(Arc::new(NoOpLogger::new()))
            .credential_source(Arc::new(EmptySource))
            .probe(Arc::new(Unreachable))
            .profile_registry(registry(plane))
            .build()
            .unwrap()
    }

    #[test]
    fn test_negotiates_first_version_once() {
        let plane = control_plane();
        let conn = connect(service_principal(), &plane);

        let first = conn
            .get_api_version("Microsoft.Compute/virtualMachines", &VersionOptions::default())
            .unwrap();
        let second = conn
            .get_api_version("Microsoft.Compute/virtualMachines", &VersionOptions::default())
            .unwrap();

        assert_eq!(first, "2023-03-01");
        assert_eq!(second, first);
        assert_eq!(plane.lookups(), 1);
    }

    #[test]
    fn test_resource_type_matches_ignoring_case() {
        let plane = control_plane();
        let conn = connect(service_principal(), &plane);

        let version = conn
            .get_api_version("microsoft.compute/VIRTUALMACHINES", &VersionOptions::default())
            .unwrap();
        assert_eq!(version, "2023-03-01");
    }

    #[test]
    fn test_override_wins_and_replaces_cached_value() {
        let plane = control_plane();
        let conn = connect(service_principal(), &plane);
        let rt = "Microsoft.Compute/virtualMachines";

        conn.get_api_version(rt, &VersionOptions::default()).unwrap();
        assert_eq!(plane.lookups(), 1);

        let pinned = conn.get_api_version(rt, &VersionOptions::pinned("2019-07-01")).unwrap();
        assert_eq!(pinned, "2019-07-01");

        let again = conn.get_api_version(rt, &VersionOptions::default()).unwrap();
        assert_eq!(again, "2019-07-01");
        assert_eq!(plane.lookups(), 1);
    }

    #[test]
    fn test_override_needs_no_lookup() {
        let plane = control_plane();
        let conn = connect(service_principal(), &plane);

        let version = conn
            .get_api_version("Microsoft.Nothing/atAll", &VersionOptions::pinned("2020-01-01"))
            .unwrap();

        assert_eq!(version, "2020-01-01");
        assert_eq!(plane.lookups(), 0);
        assert_eq!(plane.constructed(), 0);
        assert_eq!(conn.cached_api_version("Microsoft.Nothing/atAll").as_deref(), Some("2020-01-01"));
    }

    #[test]
    fn test_unknown_namespace() {
        let plane = control_plane();
        let conn = connect(service_principal().with_api_profile("V2020_09_01_Hybrid"), &plane);

        let err = conn
            .get_api_version("Microsoft.Unknown/things", &VersionOptions::default())
            .unwrap_err();

        match err {
            ConnectionError::NamespaceNotFound { namespace, profile, .. } => {
                assert_eq!(namespace, "Microsoft.Unknown");
                assert_eq!(profile, "V2020_09_01_Hybrid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(conn.cached_api_version_count(), 0);
    }

    #[test]
    fn test_auth_failure_is_not_a_namespace_error() {
        let plane = control_plane().rejecting_tokens();
        let conn = connect(service_principal(), &plane);

        let err = conn
            .get_api_version("Microsoft.Compute/virtualMachines", &VersionOptions::default())
            .unwrap_err();

        assert!(
            matches!(err, ConnectionError::Client(ClientError::Auth(_))),
            "unexpected error: {err:?}"
        );
        assert_eq!(conn.cached_api_version_count(), 0);
    }

    #[test]
    fn test_missing_subscription_is_not_a_namespace_error() {
        let mut options = service_principal();
        options.subscription_id = None;
        let conn = Connection::builder()
            .options(options)
            .logger(Arc::new(NoOpLogger::new()))
            .credential_source(Arc::new(EmptySource))
            .probe(Arc::new(Unreachable))
            .profile_registry(Arc::new(ProfileRegistry::builtin()))
            .build()
            .unwrap();

        let err = conn
            .get_api_version("Microsoft.Compute/virtualMachines", &VersionOptions::default())
            .unwrap_err();

        assert!(
            matches!(err, ConnectionError::Client(ClientError::Configuration(_))),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_unknown_resource_type() {
        let plane = control_plane();
        let conn = connect(service_principal(), &plane);

        let err = conn
            .get_api_version("Microsoft.Compute/spaceships", &VersionOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ConnectionError::ResourceTypeNotFound { ref resource_type, ref namespace, .. }
                if resource_type == "spaceships" && namespace == "Microsoft.Compute"
        ));

        // A type with no versions is no better than a missing one
        let err = conn
            .get_api_version("Microsoft.Compute/retiredThings", &VersionOptions::default())
            .unwrap_err();
        assert!(matches!(err, ConnectionError::ResourceTypeNotFound { .. }));
    }

    #[test]
    fn test_namespace_without_type() {
        let plane = control_plane();
        let conn = connect(service_principal(), &plane);

        let err = conn
            .get_api_version("Microsoft.Storage", &VersionOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ConnectionError::ResourceTypeNotFound { ref namespace, .. } if namespace == "Microsoft.Storage"
        ));
    }

    #[test]
    fn test_vault_requires_name() {
        let plane = control_plane();
        let conn = connect(service_principal(), &plane);

        let err = conn.get_client(ResourceFamily::Vault, &ClientOptions::default()).unwrap_err();
        assert!(matches!(err, ConnectionError::Configuration(_)));

        let err = conn
            .get_client(ResourceFamily::Vault, &ClientOptions::vault(""))
            .unwrap_err();
        assert!(matches!(err, ConnectionError::Configuration(_)));
        assert_eq!(plane.constructed(), 0);
    }

    #[test]
    fn test_cached_client_is_reused() {
        let plane = control_plane();
        let conn = connect(service_principal(), &plane);

        let a = conn.get_client(ResourceFamily::ResourceManagement, &ClientOptions::default()).unwrap();
        let b = conn.get_client(ResourceFamily::ResourceManagement, &ClientOptions::default()).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(plane.constructed(), 1);
        assert_eq!(conn.cached_client_count(), 1);
    }

    #[test]
    fn test_disabled_cache_builds_fresh_clients() {
        let plane = control_plane();
        let conn = connect(service_principal(), &plane);

        conn.get_client(ResourceFamily::ResourceManagement, &ClientOptions::default()).unwrap();
        conn.disable_cache();
        assert!(!conn.cache_enabled());
        assert_eq!(conn.cached_client_count(), 0);

        let a = conn.get_client(ResourceFamily::ResourceManagement, &ClientOptions::default()).unwrap();
        let b = conn.get_client(ResourceFamily::ResourceManagement, &ClientOptions::default()).unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(conn.cached_client_count(), 0);
        assert_eq!(plane.constructed(), 3);

        conn.enable_cache();
        let c = conn.get_client(ResourceFamily::ResourceManagement, &ClientOptions::default()).unwrap();
        let d = conn.get_client(ResourceFamily::ResourceManagement, &ClientOptions::default()).unwrap();
        assert!(Arc::ptr_eq(&c, &d));
    }

    #[test]
    fn test_vault_client_gets_scoped_credentials() {
        let plane = control_plane();
        let conn = connect(service_principal(), &plane);

        let client = conn.get_client(ResourceFamily::Vault, &ClientOptions::vault("myvault")).unwrap();

        assert_eq!(client.base_url(), "https://myvault.vault.azure.net");
        assert_eq!(client.credentials().token_audience.as_deref(), Some("https://vault.azure.net"));
        assert_eq!(
            client.credentials().credentials.provider().settings().token_audience,
            "https://vault.azure.net"
        );
        let mock = client.as_any().downcast_ref::<MockClient>().unwrap();
        assert_eq!(mock.vault_name(), Some("myvault"));

        // The connection's own bundle is untouched
        assert!(conn.credentials().token_audience.is_none());
        assert_eq!(
            conn.credentials().credentials.provider().settings().token_audience,
            "https://management.core.windows.net/"
        );
    }

    #[test]
    fn test_vault_audience_from_options() {
        let plane = control_plane();
        let options = service_principal().with_cloud_ad_vault_resource_id("https://vault.example.test");
        let conn = connect(options, &plane);

        let client = conn.get_client(ResourceFamily::Vault, &ClientOptions::vault("v")).unwrap();
        assert_eq!(client.credentials().token_audience.as_deref(), Some("https://vault.example.test"));
    }

    #[test]
    fn test_identity_client_targets_graph() {
        let plane = control_plane();
        let conn = connect(service_principal(), &plane);

        let client = conn.get_client_named("graph_rbac", &ClientOptions::default()).unwrap();

        assert_eq!(client.family(), ResourceFamily::Identity);
        assert_eq!(client.base_url(), "https://graph.windows.net/");
        assert_eq!(client.credentials().active_directory_settings.token_audience, "https://graph.windows.net/");
        assert!(client.providers().is_none());
    }

    #[test]
    fn test_unknown_family_name() {
        let plane = control_plane();
        let conn = connect(service_principal(), &plane);

        let err = conn.get_client_named("compute", &ClientOptions::default()).unwrap_err();
        assert!(matches!(err, ConnectionError::UnknownResourceFamily(ref name) if name == "compute"));
    }

    #[test]
    fn test_unknown_profile_lists_choices() {
        let plane = control_plane();
        let conn = connect(service_principal().with_api_profile("V1999_01_01"), &plane);

        let err = conn
            .get_client(ResourceFamily::ResourceManagement, &ClientOptions::default())
            .unwrap_err();

        match &err {
            ConnectionError::Profile { profile, available, .. } => {
                assert_eq!(profile, "V1999_01_01");
                assert!(available.contains(&"Latest".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("Latest"));
    }

    #[test]
    fn test_host_overrides_subscription() {
        let plane = control_plane();
        let conn = connect(service_principal().with_host("from-host"), &plane);

        assert_eq!(conn.uri(), "azure://from-host");
        assert_eq!(conn.unique_identifier(), Some("from-host"));
        assert_eq!(conn.credentials().subscription_id.as_deref(), Some("from-host"));
    }

    #[test]
    fn test_empty_host_keeps_subscription() {
        let plane = control_plane();
        let conn = connect(
            service_principal().with_subscription_id("real-sub").with_host(""),
            &plane,
        );

        assert_eq!(conn.uri(), "azure://real-sub");
        assert_eq!(conn.unique_identifier(), Some("real-sub"));
        assert_eq!(conn.credentials().subscription_id.as_deref(), Some("real-sub"));
    }

    #[test]
    fn test_unique_identifier_falls_back_to_tenant() {
        let plane = control_plane();
        let mut options = service_principal();
        options.subscription_id = None;
        let conn = connect(options, &plane);

        assert_eq!(conn.unique_identifier(), Some("tenant"));
        assert_eq!(conn.uri(), "azure://");
    }

    #[test]
    fn test_accessors() {
        let plane = control_plane();
        let conn = connect(service_principal(), &plane);

        assert_eq!(conn.strategy().name(), "service_principal");
        assert_eq!(conn.credentials().provider_kind(), TokenProviderKind::ServicePrincipal);
        assert!(conn.environment().is_public());
        assert_eq!(conn.msi_port(), Some(50342));

        let platform = conn.platform();
        assert_eq!(platform.name, "azure");
        assert_eq!(platform.families, vec!["cloud", "api"]);
        assert!(platform.release.starts_with("azbroker-v"));
    }

    #[test]
    fn test_missing_secret_fails_construction() {
        let plane = control_plane();
        let result = Connection::builder()
            .options(ConnectionOptions::new().with_tenant_id("tenant").with_client_id("client"))
            .logger(Arc::new(NoOpLogger::new()))
            .credential_source(Arc::new(EmptySource))
            .probe(Arc::new(Unreachable))
            .profile_registry(registry(&plane))
            .build();

        assert!(matches!(result, Err(ConnectionError::Configuration(_))));
    }

    #[test]
    fn test_custom_cloud_endpoints_reach_clients() {
        let plane = control_plane();
        let options = service_principal()
            .with_cloud_name("AzureStack")
            .with_cloud_portal_url("https://portal.local.azurestack.external")
            .with_cloud_publishing_profile_url("https://portal.local.azurestack.external/publish")
            .with_cloud_management_endpoint_url("https://management.local.azurestack.external")
            .with_cloud_resource_management_url("https://management.local.azurestack.external/")
            .with_cloud_sql_management_endpoint_url("https://sql.local.azurestack.external")
            .with_cloud_sql_server_hostname_suffix(".database.local.azurestack.external")
            .with_cloud_gallery_endpoint_url("https://gallery.local.azurestack.external")
            .with_cloud_ad_endpoint_url("https://adfs.local.azurestack.external/adfs")
            .with_cloud_ad_resource_id("https://management.adfs.azurestack.local/")
            .with_cloud_ad_graph_resource_id("https://graph.local.azurestack.external/")
            .with_cloud_key_vault_dns_suffix(".vault.local.azurestack.external");
        let conn = connect(options, &plane);

        assert_eq!(conn.environment().name, "AzureStack");

        let rm = conn.get_client(ResourceFamily::ResourceManagement, &ClientOptions::default()).unwrap();
        assert_eq!(rm.base_url(), "https://management.local.azurestack.external/");

        let vault = conn.get_client(ResourceFamily::Vault, &ClientOptions::vault("kv")).unwrap();
        assert_eq!(vault.base_url(), "https://kv.vault.local.azurestack.external");
    }

    #[test]
    fn test_builtin_registry_builds_http_client() {
        let conn = Connection::builder()
            .options(service_principal())
            .logger(Arc::new(NoOpLogger::new()))
            .credential_source(Arc::new(EmptySource))
            .probe(Arc::new(Unreachable))
            .profile_registry(Arc::new(ProfileRegistry::builtin()))
            .build()
            .unwrap();

        let client = conn.get_client(ResourceFamily::ResourceManagement, &ClientOptions::default()).unwrap();
        let management = client.as_any().downcast_ref::<ManagementClient>().unwrap();

        assert_eq!(management.profile().default_api_version, "2021-04-01");
        assert_eq!(
            management.provider_url("Microsoft.Compute").unwrap(),
            "https://management.azure.com/subscriptions/sub/providers/Microsoft.Compute"
        );
        assert!(client.providers().is_some());
    }
}
