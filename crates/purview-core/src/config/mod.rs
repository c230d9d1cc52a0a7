//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod account;
pub mod auth;
pub mod logging;
pub mod naming;

use serde::{Deserialize, Serialize};

use self::account::{AccountConfig, ApiVersions, HttpConfig};
use self::auth::AuthConfig;
use self::logging::LoggingConfig;
use self::naming::{AssetConfig, CollectionConfig, NamingConfig};

use crate::error::AppError;

/// Prefix for environment variable overrides (`PURVIEW__ACCOUNT__NAME`, ...).
pub const ENV_PREFIX: &str = "PURVIEW";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog account and endpoints.
    pub account: AccountConfig,
    /// Default `api-version` values.
    #[serde(default)]
    pub api: ApiVersions,
    /// Credential settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,
    /// Id generation settings.
    #[serde(default)]
    pub naming: NamingConfig,
    /// Collection create/delete settings.
    #[serde(default)]
    pub collections: CollectionConfig,
    /// Asset purge settings.
    #[serde(default)]
    pub assets: AssetConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Builds a configuration for `account` with every other section defaulted.
    pub fn for_account(account: impl Into<String>) -> Self {
        Self {
            account: AccountConfig::new(account),
            api: ApiVersions::default(),
            auth: AuthConfig::default(),
            http: HttpConfig::default(),
            naming: NamingConfig::default(),
            collections: CollectionConfig::default(),
            assets: AssetConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from TOML files.
    ///
    /// Merges the base file at `path`, an optional `config/{env}` overlay,
    /// and environment variables prefixed with `PURVIEW__`.
    pub fn load(path: &str, env: Option<&str>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(path).required(false));

        if let Some(env) = env {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        Self::finish(config)
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        Self::finish(config)
    }

    fn finish(config: config::Config) -> Result<Self, AppError> {
        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Checks cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.account.name.trim().is_empty() {
            return Err(AppError::configuration("account.name must not be empty"));
        }
        if self.assets.batch_size == 0 || self.assets.batch_size > 1000 {
            return Err(AppError::configuration(
                "assets.batch_size must be between 1 and 1000",
            ));
        }
        if self.naming.retry_budget == 0 {
            return Err(AppError::configuration(
                "naming.retry_budget must be at least 1",
            ));
        }
        Ok(())
    }
}
