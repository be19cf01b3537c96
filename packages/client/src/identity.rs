//! Identity provider adapters.
//!
//! The session only needs three things from an identity provider: a
//! one-time handshake, a way to obtain a fresh token, and a way to end the
//! provider-side session.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use common::config::IdentityConfig;

use crate::error::ClientError;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// One-time handshake. `Ok(None)` means the provider answered but the
    /// user is not authenticated.
    async fn init(&self) -> Result<Option<String>, ClientError>;

    /// Acquires a fresh access token.
    async fn login(&self) -> Result<String, ClientError>;

    /// Ends the provider-side session.
    async fn logout(&self) -> Result<(), ClientError>;
}

/// A pre-issued bearer token.
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: Option<String>,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// A provider that never authenticates.
    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl IdentityProvider for StaticToken {
    async fn init(&self) -> Result<Option<String>, ClientError> {
        Ok(self.token.clone())
    }

    async fn login(&self) -> Result<String, ClientError> {
        self.token
            .clone()
            .ok_or_else(|| ClientError::Identity("no token configured".into()))
    }

    async fn logout(&self) -> Result<(), ClientError> {
        Ok(())
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// OpenID Connect direct-access (password) grant against a Keycloak realm.
pub struct KeycloakPasswordGrant {
    http: Client,
    config: IdentityConfig,
    username: String,
    password: String,
    refresh_token: Mutex<Option<String>>,
}

impl KeycloakPasswordGrant {
    pub fn new(
        http: Client,
        config: IdentityConfig,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            http,
            config,
            username: username.into(),
            password: password.into(),
            refresh_token: Mutex::new(None),
        }
    }

    fn endpoint(&self, name: &str) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/{name}",
            self.config.url.trim_end_matches('/'),
            self.config.realm
        )
    }

    async fn grant(&self) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.endpoint("token"))
            .form(&[
                ("grant_type", "password"),
                ("client_id", self.config.client_id.as_str()),
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Identity(format!(
                "token request rejected ({status}): {body}"
            )));
        }

        let tokens: TokenResponse = serde_json::from_slice(&response.bytes().await?)?;
        *self.refresh_token.lock().await = tokens.refresh_token;
        info!(realm = %self.config.realm, username = %self.username, "Obtained access token");
        Ok(tokens.access_token)
    }
}

#[async_trait]
impl IdentityProvider for KeycloakPasswordGrant {
    async fn init(&self) -> Result<Option<String>, ClientError> {
        match self.grant().await {
            Ok(token) => Ok(Some(token)),
            Err(ClientError::Identity(detail)) => {
                warn!("Identity provider refused credentials: {detail}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn login(&self) -> Result<String, ClientError> {
        self.grant().await
    }

    async fn logout(&self) -> Result<(), ClientError> {
        let Some(refresh_token) = self.refresh_token.lock().await.take() else {
            return Ok(());
        };

        let response = self
            .http
            .post(self.endpoint("logout"))
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("refresh_token", refresh_token.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Identity(format!(
                "logout rejected ({})",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Picks a provider from configuration: an explicit token wins over
/// username/password.
pub fn provider_from_config(
    http: Client,
    config: &IdentityConfig,
) -> Result<Arc<dyn IdentityProvider>, ClientError> {
    if let Some(token) = &config.token {
        return Ok(Arc::new(StaticToken::new(token.clone())));
    }

    match (&config.username, &config.password) {
        (Some(username), Some(password)) => Ok(Arc::new(KeycloakPasswordGrant::new(
            http,
            config.clone(),
            username.clone(),
            password.clone(),
        ))),
        _ => Err(ClientError::Identity(
            "no credentials configured: set identity.token or identity.username/password".into(),
        )),
    }
}
