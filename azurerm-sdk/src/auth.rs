//! Bearer token acquisition for Resource Manager requests.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::environment::Environment;
use crate::error::{Error, Result};

/// Tokens are refreshed this long before they expire
const EXPIRY_BUFFER: Duration = Duration::from_secs(300);

/// Source of bearer tokens for the `Authorization` header
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn token(&self) -> Result<String>;
}

/// Authorizer handing out a fixed, pre-acquired token
pub struct StaticTokenAuthorizer {
    token: SecretString,
}

impl StaticTokenAuthorizer {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }
}

#[async_trait]
impl Authorizer for StaticTokenAuthorizer {
    async fn token(&self) -> Result<String> {
        Ok(self.token.expose_secret().to_string())
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    value: SecretString,
    expires_at: Option<Instant>,
}

impl CachedToken {
    fn will_expire_soon(&self) -> bool {
        self.expires_at
            .map(|exp| exp.saturating_duration_since(Instant::now()) < EXPIRY_BUFFER)
            .unwrap_or(false)
    }
}

/// OAuth2 client-credentials flow against the environment's login authority
pub struct ClientSecretAuthorizer {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: SecretString,
    scope: String,
    cached: Mutex<Option<CachedToken>>,
}

impl ClientSecretAuthorizer {
    pub fn new(
        environment: &Environment,
        tenant_id: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: format!(
                "{}/{}/oauth2/v2.0/token",
                environment.authority.trim_end_matches('/'),
                tenant_id
            ),
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            scope: environment.scope(),
            cached: Mutex::new(None),
        }
    }

    async fn acquire(&self) -> Result<CachedToken> {
        log::debug!("requesting token from {}", self.token_url);
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("scope", self.scope.as_str()),
        ];
        let response = self.http.post(&self.token_url).form(&params).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!(
                "token request returned {}: {}",
                status, body
            )));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Auth(format!("decoding token response: {}", e)))?;
        Ok(CachedToken {
            value: SecretString::from(token.access_token),
            expires_at: token
                .expires_in
                .map(|secs| Instant::now() + Duration::from_secs(secs)),
        })
    }
}

#[async_trait]
impl Authorizer for ClientSecretAuthorizer {
    async fn token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && !token.will_expire_soon()
        {
            return Ok(token.value.expose_secret().to_string());
        }
        let token = self.acquire().await?;
        let value = token.value.expose_secret().to_string();
        *cached = Some(token);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn static_token() {
        let auth = StaticTokenAuthorizer::new("abc");
        assert_eq!(auth.token().await.unwrap(), "abc");
    }

    #[tokio::test]
    async fn client_secret_token_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "token-1",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let env = Environment::custom(format!("{}/", server.uri()));
        let auth = ClientSecretAuthorizer::new(&env, "tenant-1", "client", "secret");

        assert_eq!(auth.token().await.unwrap(), "token-1");
        assert_eq!(auth.token().await.unwrap(), "token-1");
    }

    #[tokio::test]
    async fn short_lived_token_is_refreshed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "short",
                "expires_in": 10
            })))
            .expect(2)
            .mount(&server)
            .await;

        let env = Environment::custom(server.uri());
        let auth = ClientSecretAuthorizer::new(&env, "tenant-1", "client", "secret");
        auth.token().await.unwrap();
        auth.token().await.unwrap();
    }

    #[tokio::test]
    async fn rejected_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
            .mount(&server)
            .await;

        let env = Environment::custom(server.uri());
        let auth = ClientSecretAuthorizer::new(&env, "tenant-1", "client", "wrong");
        let err = auth.token().await.unwrap_err();
        assert!(matches!(err, Error::Auth(ref msg) if msg.contains("401")));
    }
}
