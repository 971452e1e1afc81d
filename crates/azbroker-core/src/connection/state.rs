//! Mutable per-connection state

use std::collections::HashMap;

use crate::clients::SharedClient;
use crate::profiles::ResourceFamily;

/// API version table and client cache of one connection
///
/// Both live behind the connection's single mutex. The version table only
/// grows; client handles are dropped only when caching is disabled.
#[derive(Debug)]
pub(crate) struct ConnectionState {
    api_versions: HashMap<String, String>,
    clients: HashMap<ResourceFamily, SharedClient>,
    cache_enabled: bool,
}

impl ConnectionState {
    pub(crate) fn new() -> Self {
        Self {
            api_versions: HashMap::new(),
            clients: HashMap::new(),
            cache_enabled: true,
        }
    }

    pub(crate) fn api_version(&self, resource_type: &str) -> Option<&String> {
        self.api_versions.get(resource_type)
    }

    /// Record an explicit override, replacing any earlier value
    pub(crate) fn pin_api_version(&mut self, resource_type: &str, version: String) {
        self.api_versions.insert(resource_type.to_string(), version);
    }

    /// Record a negotiated version unless one was stored meanwhile
    pub(crate) fn record_api_version(&mut self, resource_type: &str, version: String) -> String {
        self.api_versions
            .entry(resource_type.to_string())
            .or_insert(version)
            .clone()
    }

    pub(crate) fn api_version_count(&self) -> usize {
        self.api_versions.len()
    }

    pub(crate) fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    pub(crate) fn set_cache_enabled(&mut self, enabled: bool) {
        self.cache_enabled = enabled;
        if !enabled {
            self.clients.clear();
        }
    }

    pub(crate) fn cached_client(&self, family: ResourceFamily) -> Option<SharedClient> {
        if !self.cache_enabled {
            return None;
        }
        self.clients.get(&family).cloned()
    }

    /// Store a handle if caching is on; returns the handle callers should use
    pub(crate) fn store_client(&mut self, family: ResourceFamily, client: SharedClient) -> SharedClient {
        if !self.cache_enabled {
            return client;
        }
        self.clients.entry(family).or_insert(client).clone()
    }

    pub(crate) fn cached_client_count(&self) -> usize {
        self.clients.len()
    }
}
