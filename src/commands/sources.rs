//! Data source CLI commands.

use clap::{Args, Subcommand};

use purview_core::error::AppError;
use purview_service::RegisterDataSource;

use super::Services;
use crate::output::{self, OutputFormat};

/// Arguments for data source commands
#[derive(Debug, Args)]
pub struct SourcesArgs {
    /// Data source subcommand
    #[command(subcommand)]
    pub command: SourcesCommand,
}

/// Data source subcommands
#[derive(Debug, Subcommand)]
pub enum SourcesCommand {
    /// Register an ADLS Gen2 account under a collection
    Register {
        /// Storage account name
        #[arg(long)]
        data_lake: String,
        /// Subscription id
        #[arg(long)]
        subscription: String,
        /// Resource group
        #[arg(long)]
        resource_group: String,
        /// Collection id or friendly name
        #[arg(long)]
        collection: String,
        /// Display name (defaults to the account name plus a random suffix)
        #[arg(long)]
        nickname: Option<String>,
    },
}

/// Execute data source commands
pub async fn execute(
    args: &SourcesArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        SourcesCommand::Register {
            data_lake,
            subscription,
            resource_group,
            collection,
            nickname,
        } => {
            let record = services
                .sources
                .register_data_source(RegisterDataSource {
                    data_lake_name: data_lake.clone(),
                    subscription_id: subscription.clone(),
                    resource_group: resource_group.clone(),
                    collection: collection.clone(),
                    nickname: nickname.clone(),
                })
                .await?;

            output::print_item(&record, format, |record| {
                output::print_success(&format!("Data source '{}' registered.", record.name));
                output::print_kv("Kind", record.kind.as_deref().unwrap_or("-"));
                output::print_kv("Id", record.id.as_deref().unwrap_or("-"));
            });
        }
    }

    Ok(())
}
