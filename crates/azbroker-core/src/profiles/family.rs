//! Resource families a connection builds clients for

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ProfileError;

/// Group of APIs served by one client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceFamily {
    /// Resource manager: providers, resource groups, generic resources
    #[default]
    ResourceManagement,
    /// Directory graph: users, groups, service principals
    Identity,
    /// Key vault management
    Vault,
}

impl ResourceFamily {
    pub const ALL: [ResourceFamily; 3] = [Self::ResourceManagement, Self::Identity, Self::Vault];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResourceManagement => "resource_management",
            Self::Identity => "identity",
            Self::Vault => "vault",
        }
    }
}

impl fmt::Display for ResourceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceFamily {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "resources" | "resource_management" | "management" => Ok(Self::ResourceManagement),
            "graph" | "graph_rbac" | "identity" => Ok(Self::Identity),
            "vault" | "key_vault" | "keyvault" => Ok(Self::Vault),
            _ => Err(ProfileError::UnknownFamily(s.to_string())),
        }
    }
}
