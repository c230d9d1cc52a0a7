//! Bearer credential providers.
//!
//! Two real flows mirror how operators authenticate against the catalog:
//! a service principal exchanging a client secret, and delegation to the
//! ambient Azure CLI login. Both cache tokens per scope until shortly
//! before they expire.

pub mod azure_cli;
pub mod cache;
pub mod client_secret;
pub mod static_token;

use std::sync::Arc;
use std::time::Duration;

use purview_core::config::AppConfig;
use purview_core::config::auth::AuthMethod;
use purview_core::error::AppError;
use purview_core::result::AppResult;
use purview_core::traits::TokenProvider;

pub use azure_cli::AzureCliCredential;
pub use client_secret::ClientSecretCredential;
pub use static_token::StaticTokenProvider;

/// Builds the credential selected by `auth.method`.
pub fn credential_from_config(config: &AppConfig) -> AppResult<Arc<dyn TokenProvider>> {
    let auth = &config.auth;
    let skew = Duration::from_secs(auth.refresh_skew_seconds);

    let provider: Arc<dyn TokenProvider> = match auth.method {
        AuthMethod::ServicePrincipal => {
            if auth.tenant_id.is_empty() || auth.client_id.is_empty() || auth.client_secret.is_empty()
            {
                return Err(AppError::configuration(
                    "auth.tenant_id, auth.client_id and auth.client_secret are required for service_principal",
                ));
            }
            Arc::new(ClientSecretCredential::new(
                &auth.authority_host,
                &auth.tenant_id,
                &auth.client_id,
                &auth.client_secret,
                Duration::from_secs(config.http.request_timeout_seconds),
                skew,
            )?)
        }
        AuthMethod::AzureCli => Arc::new(AzureCliCredential::new(skew)),
        AuthMethod::Static => {
            if auth.token.is_empty() {
                return Err(AppError::configuration(
                    "auth.token is required for the static method",
                ));
            }
            Arc::new(StaticTokenProvider::new(auth.token.clone()))
        }
    };

    Ok(provider)
}
