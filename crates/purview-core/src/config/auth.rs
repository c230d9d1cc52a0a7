//! Credential configuration.

use serde::{Deserialize, Serialize};

/// Which credential flow yields bearer tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// OAuth2 client-credentials exchange with a service principal.
    ServicePrincipal,
    /// Delegate to the ambient Azure CLI login.
    #[default]
    AzureCli,
    /// A pre-issued token supplied through configuration.
    Static,
}

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Credential flow to use.
    #[serde(default)]
    pub method: AuthMethod,
    /// Entra ID tenant (service principal only).
    #[serde(default)]
    pub tenant_id: String,
    /// Application (client) id (service principal only).
    #[serde(default)]
    pub client_id: String,
    /// Client secret (service principal only).
    #[serde(default)]
    pub client_secret: String,
    /// Pre-issued bearer token (static only).
    #[serde(default)]
    pub token: String,
    /// Login authority host.
    #[serde(default = "default_authority")]
    pub authority_host: String,
    /// Scope requested for catalog calls.
    #[serde(default = "default_catalog_scope")]
    pub catalog_scope: String,
    /// Scope requested for Azure Resource Manager calls.
    #[serde(default = "default_management_scope")]
    pub management_scope: String,
    /// Seconds before expiry at which a cached token is refreshed.
    #[serde(default = "default_refresh_skew")]
    pub refresh_skew_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            method: AuthMethod::default(),
            tenant_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            token: String::new(),
            authority_host: default_authority(),
            catalog_scope: default_catalog_scope(),
            management_scope: default_management_scope(),
            refresh_skew_seconds: default_refresh_skew(),
        }
    }
}

fn default_authority() -> String {
    "https://login.microsoftonline.com".to_string()
}

fn default_catalog_scope() -> String {
    "https://purview.azure.net/.default".to_string()
}

fn default_management_scope() -> String {
    "https://management.azure.com/.default".to_string()
}

fn default_refresh_skew() -> u64 {
    300
}
