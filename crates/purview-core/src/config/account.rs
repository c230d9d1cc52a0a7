//! Account, endpoint, and API version configuration.

use serde::{Deserialize, Serialize};

/// The catalog account every call is issued against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Account name; also the id of the root collection.
    pub name: String,
    /// Override for the account base URL (defaults to
    /// `https://{name}.purview.azure.com`).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Azure Resource Manager base URL.
    #[serde(default = "default_management_endpoint")]
    pub management_endpoint: String,
}

impl AccountConfig {
    /// Creates an account config with default endpoints.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: None,
            management_endpoint: default_management_endpoint(),
        }
    }

    /// The base URL all catalog paths are appended to.
    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.purview.azure.com", self.name),
        }
    }
}

/// Default `api-version` query values per REST surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiVersions {
    /// Collections endpoints (`/account/collections`).
    #[serde(default = "default_collections")]
    pub collections: String,
    /// Catalog search and entity endpoints (`/catalog`).
    #[serde(default = "default_catalog")]
    pub catalog: String,
    /// Data-source endpoints (`/scan/datasources`).
    #[serde(default = "default_scan")]
    pub scan: String,
    /// Storage account lookups against Azure Resource Manager.
    #[serde(default = "default_storage")]
    pub storage: String,
}

impl Default for ApiVersions {
    fn default() -> Self {
        Self {
            collections: default_collections(),
            catalog: default_catalog(),
            scan: default_scan(),
            storage: default_storage(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: default_request_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

fn default_management_endpoint() -> String {
    "https://management.azure.com".to_string()
}

fn default_collections() -> String {
    "2019-11-01-preview".to_string()
}

fn default_catalog() -> String {
    "2022-03-01-preview".to_string()
}

fn default_scan() -> String {
    "2022-02-01-preview".to_string()
}

fn default_storage() -> String {
    "2022-09-01".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}
