//! OAuth2 client-credentials exchange for a service principal.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use purview_core::error::{AppError, ErrorKind};
use purview_core::result::AppResult;
use purview_core::traits::TokenProvider;

use super::cache::{CachedToken, TokenCache};

/// Token endpoint response (success and error share one shape).
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Exchanges a client id and secret for bearer tokens.
pub struct ClientSecretCredential {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    cache: TokenCache,
}

impl std::fmt::Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl ClientSecretCredential {
    /// Creates a credential for `tenant_id` at `authority_host`.
    pub fn new(
        authority_host: &str,
        tenant_id: &str,
        client_id: &str,
        client_secret: &str,
        timeout: Duration,
        refresh_skew: Duration,
    ) -> AppResult<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to create token HTTP client: {e}"),
                e,
            )
        })?;

        Ok(Self {
            http,
            token_url: format!(
                "{}/{tenant_id}/oauth2/v2.0/token",
                authority_host.trim_end_matches('/')
            ),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            cache: TokenCache::new(refresh_skew),
        })
    }

    async fn request_token(&self, scope: &str) -> AppResult<CachedToken> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("scope", scope),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Authentication,
                    format!("Token request failed: {e}"),
                    e,
                )
            })?;

        let body: TokenResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Authentication,
                format!("Token response was not understood: {e}"),
                e,
            )
        })?;

        match body.access_token {
            Some(token) => Ok(CachedToken {
                token,
                expires_at: Utc::now() + chrono::Duration::seconds(body.expires_in.unwrap_or(3600)),
            }),
            None => Err(AppError::authentication(format!(
                "{}: {}",
                body.error.unwrap_or_else(|| "unknown_error".to_string()),
                body.error_description.unwrap_or_default()
            ))),
        }
    }
}

#[async_trait]
impl TokenProvider for ClientSecretCredential {
    async fn access_token(&self, scope: &str) -> AppResult<String> {
        if let Some(token) = self.cache.get(scope, Utc::now()).await {
            return Ok(token);
        }

        debug!(scope, "Requesting client-credentials token");
        let fresh = self.request_token(scope).await?;
        let token = fresh.token.clone();
        self.cache.put(scope, fresh).await;
        Ok(token)
    }
}
