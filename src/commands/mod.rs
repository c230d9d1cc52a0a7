//! CLI command definitions and dispatch.

pub mod assets;
pub mod collections;
pub mod sources;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use purview_client::{HttpCatalogClient, credential_from_config};
use purview_core::config::AppConfig;
use purview_core::error::AppError;
use purview_core::traits::CatalogApi;
use purview_service::{
    AssetPurger, CollectionService, CollectionSettings, DataSourceService, NameGenerator,
};

use crate::output::OutputFormat;

/// Purview automation: collections, assets, and data sources
#[derive(Debug, Parser)]
#[command(name = "purview", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay (loads config/{env}.toml)
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Collection management
    Collections(collections::CollectionsArgs),
    /// Asset management
    Assets(assets::AssetsArgs),
    /// Data source management
    Sources(sources::SourcesArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let services = Services::from_config(&config)?;
        match &self.command {
            Commands::Collections(args) => {
                collections::execute(args, &services, self.format).await
            }
            Commands::Assets(args) => assets::execute(args, &services, &config, self.format).await,
            Commands::Sources(args) => sources::execute(args, &services, self.format).await,
        }
    }
}

/// Services wired from configuration.
pub struct Services {
    /// Collection reads and writes.
    pub collections: Arc<CollectionService>,
    /// Asset purge.
    pub assets: AssetPurger,
    /// Data-source registration.
    pub sources: DataSourceService,
}

impl Services {
    /// Builds the HTTP client, credential, and every service.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let credential = credential_from_config(config)?;
        let api: Arc<dyn CatalogApi> = Arc::new(HttpCatalogClient::new(config, credential)?);
        let names = Arc::new(NameGenerator::from_seed(config.naming.seed));

        let collections = Arc::new(CollectionService::new(
            api.clone(),
            names.clone(),
            CollectionSettings::from_config(config),
        ));
        let assets = AssetPurger::from_config(api.clone(), collections.clone(), config);
        let sources = DataSourceService::from_config(api, collections.clone(), names, config);

        Ok(Self {
            collections,
            assets,
            sources,
        })
    }
}
