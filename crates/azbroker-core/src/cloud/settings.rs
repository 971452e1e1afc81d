//! Directory service settings derived from a cloud environment

use serde::{Deserialize, Serialize};

use super::environment::CloudEnvironment;

/// Where tokens are issued and for which audience
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveDirectorySettings {
    /// Authority base URL, e.g. `https://login.microsoftonline.com/`
    pub authentication_endpoint: String,
    /// Resource the issued tokens are valid for
    pub token_audience: String,
}

impl ActiveDirectorySettings {
    pub fn from_environment(environment: &CloudEnvironment) -> Self {
        Self {
            authentication_endpoint: environment.active_directory_endpoint_url.clone(),
            token_audience: environment.active_directory_resource_id.clone(),
        }
    }

    /// Copy of these settings scoped to another audience
    pub fn with_token_audience(&self, audience: impl Into<String>) -> Self {
        Self {
            authentication_endpoint: self.authentication_endpoint.clone(),
            token_audience: audience.into(),
        }
    }

    /// Token endpoint of a tenant under this authority
    pub fn token_endpoint(&self, tenant_id: &str) -> String {
        format!(
            "{}/{}/oauth2/token",
            self.authentication_endpoint.trim_end_matches('/'),
            tenant_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_settings() {
        let settings = ActiveDirectorySettings::from_environment(&CloudEnvironment::public());
        assert_eq!(settings.authentication_endpoint, "https://login.microsoftonline.com/");
        assert_eq!(settings.token_audience, "https://management.core.windows.net/");
        assert_eq!(
            settings.token_endpoint("tenant"),
            "https://login.microsoftonline.com/tenant/oauth2/token"
        );
    }

    #[test]
    fn test_with_token_audience() {
        let settings = ActiveDirectorySettings::from_environment(&CloudEnvironment::public());
        let vault = settings.with_token_audience("https://vault.azure.net");
        assert_eq!(vault.token_audience, "https://vault.azure.net");
        assert_eq!(vault.authentication_endpoint, settings.authentication_endpoint);
    }
}
