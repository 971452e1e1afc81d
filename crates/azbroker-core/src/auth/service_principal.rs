//! Service principal (client credentials) token provider

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::token::{parse_token_response, AccessToken, TokenCache};
use super::traits::{AuthError, AuthResult, TokenProvider, TokenProviderKind};
use crate::cloud::ActiveDirectorySettings;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn require(value: &str, field: &'static str) -> AuthResult<String> {
    if value.is_empty() {
        return Err(AuthError::MissingField(field));
    }
    Ok(value.to_string())
}

/// Issues tokens with the client credentials grant
pub struct ServicePrincipalTokenProvider {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    settings: ActiveDirectorySettings,
    cache: TokenCache,
}

impl ServicePrincipalTokenProvider {
    /// Create a provider; tenant id, client id and secret must be non-empty
    pub fn new(
        tenant_id: &str,
        client_id: &str,
        client_secret: &str,
        settings: ActiveDirectorySettings,
    ) -> AuthResult<Self> {
        Ok(Self {
            tenant_id: require(tenant_id, "tenant_id")?,
            client_id: require(client_id, "client_id")?,
            client_secret: require(client_secret, "client_secret")?,
            settings,
            cache: TokenCache::new(),
        })
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    fn request_token(&self) -> AuthResult<AccessToken> {
        let endpoint = self.settings.token_endpoint(&self.tenant_id);
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("resource", self.settings.token_audience.as_str()),
        ];

        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let response = client.post(&endpoint).form(&params).send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(AuthError::TokenRequest {
                endpoint,
                status: status.as_u16(),
                message: body,
            });
        }

        parse_token_response(&body)
    }
}

impl fmt::Debug for ServicePrincipalTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServicePrincipalTokenProvider")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("settings", &self.settings)
            .finish()
    }
}

impl TokenProvider for ServicePrincipalTokenProvider {
    fn kind(&self) -> TokenProviderKind {
        TokenProviderKind::ServicePrincipal
    }

    fn settings(&self) -> &ActiveDirectorySettings {
        &self.settings
    }

    fn token(&self) -> AuthResult<AccessToken> {
        self.cache.get_or_fetch(|| self.request_token())
    }

    fn with_audience(&self, audience: &str) -> Arc<dyn TokenProvider> {
        Arc::new(Self {
            tenant_id: self.tenant_id.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            settings: self.settings.with_token_audience(audience),
            cache: TokenCache::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::CloudEnvironment;
    use crate::testing::StubServer;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn settings() -> ActiveDirectorySettings {
        ActiveDirectorySettings::from_environment(&CloudEnvironment::public())
    }

    #[test]
    fn test_requires_all_fields() {
        assert!(matches!(
            ServicePrincipalTokenProvider::new("", "client", "secret", settings()),
            Err(AuthError::MissingField("tenant_id"))
        ));
        assert!(matches!(
            ServicePrincipalTokenProvider::new("tenant", "", "secret", settings()),
            Err(AuthError::MissingField("client_id"))
        ));
        assert!(matches!(
            ServicePrincipalTokenProvider::new("tenant", "client", "", settings()),
            Err(AuthError::MissingField("client_secret"))
        ));
    }

    #[test]
    fn test_with_audience_keeps_identity() {
        let provider = ServicePrincipalTokenProvider::new("tenant", "client", "secret", settings()).unwrap();
        let scoped = provider.with_audience("https://vault.azure.net");

        assert_eq!(scoped.kind(), TokenProviderKind::ServicePrincipal);
        assert_eq!(scoped.settings().token_audience, "https://vault.azure.net");
        assert_eq!(provider.settings().token_audience, "https://management.core.windows.net/");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let provider = ServicePrincipalTokenProvider::new("tenant", "client", "hunter2", settings()).unwrap();
        let debug = format!("{:?}", provider);
        assert!(debug.contains("client"));
        assert!(!debug.contains("hunter2"));
    }

    fn stub_settings(server: &StubServer) -> ActiveDirectorySettings {
        ActiveDirectorySettings {
            authentication_endpoint: format!("{}/", server.uri()),
            token_audience: "https://management.core.windows.net/".to_string(),
        }
    }

    #[test]
    fn test_client_credentials_grant() {
        let server = StubServer::start();
        server.mount(
            Mock::given(method("POST"))
                .and(path("/tenant/oauth2/token"))
                .and(header("content-type", "application/x-www-form-urlencoded"))
                .and(body_string_contains("grant_type=client_credentials"))
                .and(body_string_contains("client_id=client"))
                .and(body_string_contains("client_secret=secret"))
                .and(body_string_contains("resource=https%3A%2F%2Fmanagement.core.windows.net%2F"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "access_token": "sp-token",
                    "expires_in": 3599,
                    "token_type": "Bearer"
                }))),
        );

        let provider =
            ServicePrincipalTokenProvider::new("tenant", "client", "secret", stub_settings(&server)).unwrap();

        assert_eq!(provider.token().unwrap().authorization_header(), "Bearer sp-token");
        // Served from the cache the second time
        provider.token().unwrap();
        assert_eq!(server.requests().len(), 1);
    }

    #[test]
    fn test_rejected_secret() {
        let server = StubServer::start();
        server.mount(
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client")),
        );

        let provider =
            ServicePrincipalTokenProvider::new("tenant", "client", "wrong", stub_settings(&server)).unwrap();

        match provider.token().unwrap_err() {
            AuthError::TokenRequest { endpoint, status, message } => {
                assert_eq!(endpoint, format!("{}/tenant/oauth2/token", server.uri()));
                assert_eq!(status, 401);
                assert_eq!(message, "invalid_client");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
