//! Delegation to the ambient Azure CLI login.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use purview_core::error::{AppError, ErrorKind};
use purview_core::result::AppResult;
use purview_core::traits::TokenProvider;

use super::cache::{CachedToken, TokenCache};

/// Output of `az account get-access-token --output json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliToken {
    access_token: String,
    /// Local time, e.g. `2024-05-01 13:37:00.000000` (all CLI versions).
    #[serde(default)]
    expires_on: Option<String>,
    /// POSIX timestamp (CLI 2.54+).
    #[serde(rename = "expires_on", default)]
    expires_on_epoch: Option<i64>,
}

impl CliToken {
    fn expiry(&self) -> DateTime<Utc> {
        if let Some(epoch) = self.expires_on_epoch
            && let Some(at) = Utc.timestamp_opt(epoch, 0).single()
        {
            return at;
        }

        self.expires_on
            .as_deref()
            .and_then(|raw| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").ok())
            .and_then(|naive| naive.and_local_timezone(chrono::Local).single())
            .map(|local| local.with_timezone(&Utc))
            .unwrap_or_else(|| Utc::now() + chrono::Duration::minutes(5))
    }
}

/// Obtains tokens by shelling out to `az`.
#[derive(Debug)]
pub struct AzureCliCredential {
    program: String,
    cache: TokenCache,
}

impl AzureCliCredential {
    /// Uses the `az` executable on `PATH`.
    pub fn new(refresh_skew: Duration) -> Self {
        Self::with_program("az", refresh_skew)
    }

    /// Uses a specific executable.
    pub fn with_program(program: impl Into<String>, refresh_skew: Duration) -> Self {
        Self {
            program: program.into(),
            cache: TokenCache::new(refresh_skew),
        }
    }

    async fn request_token(&self, scope: &str) -> AppResult<CachedToken> {
        let output = Command::new(&self.program)
            .args(["account", "get-access-token", "--output", "json", "--scope", scope])
            .output()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Authentication,
                    format!("Failed to run '{}': {e}. Is the Azure CLI installed?", self.program),
                    e,
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::authentication(format!(
                "Azure CLI could not issue a token (run 'az login'): {}",
                stderr.trim()
            )));
        }

        let token: CliToken = serde_json::from_slice(&output.stdout).map_err(|e| {
            AppError::with_source(
                ErrorKind::Authentication,
                format!("Azure CLI returned an unexpected token payload: {e}"),
                e,
            )
        })?;

        Ok(CachedToken {
            expires_at: token.expiry(),
            token: token.access_token,
        })
    }
}

#[async_trait]
impl TokenProvider for AzureCliCredential {
    async fn access_token(&self, scope: &str) -> AppResult<String> {
        if let Some(token) = self.cache.get(scope, Utc::now()).await {
            return Ok(token);
        }

        debug!(scope, "Requesting token from Azure CLI");
        let fresh = self.request_token(scope).await?;
        let token = fresh.token.clone();
        self.cache.put(scope, fresh).await;
        Ok(token)
    }
}
