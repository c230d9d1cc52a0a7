//! Asset management CLI commands.

use std::time::Duration;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use tokio_util::sync::CancellationToken;

use purview_core::config::AppConfig;
use purview_core::error::AppError;
use purview_service::PurgeStatus;

use super::Services;
use crate::output::{self, OutputFormat};

/// Arguments for asset commands
#[derive(Debug, Args)]
pub struct AssetsArgs {
    /// Asset subcommand
    #[command(subcommand)]
    pub command: AssetsCommand,
}

/// Asset subcommands
#[derive(Debug, Subcommand)]
pub enum AssetsCommand {
    /// Delete every asset in the given collections
    Purge {
        /// Collection ids or friendly names
        #[arg(required = true)]
        names: Vec<String>,
        /// Give up after this many minutes (default from config)
        #[arg(short, long)]
        timeout_minutes: Option<u64>,
        /// Use a name as a literal id when it also matches friendly names
        #[arg(long)]
        force_actual_name: bool,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Purge display row
#[derive(Debug, Serialize, Tabled)]
struct PurgeRow {
    /// Collection id
    collection: String,
    /// Outcome
    status: String,
    /// Delete cycles
    cycles: u32,
    /// Assets deleted
    deleted: u64,
}

/// Execute asset commands
pub async fn execute(
    args: &AssetsArgs,
    services: &Services,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        AssetsCommand::Purge {
            names,
            timeout_minutes,
            force_actual_name,
            yes,
        } => {
            if !*yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete every asset in {}?", names.join(", ")))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let minutes = timeout_minutes.unwrap_or(config.assets.timeout_minutes);
            let cancel = CancellationToken::new();
            let on_ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Interrupt received, stopping asset purge");
                    on_ctrl_c.cancel();
                }
            });

            let reports = services
                .assets
                .purge_all(
                    names,
                    *force_actual_name,
                    purge_timeout(minutes),
                    cancel,
                )
                .await?;

            let rows: Vec<PurgeRow> = reports
                .iter()
                .map(|r| PurgeRow {
                    collection: r.collection_id.clone(),
                    status: format!("{:?}", r.status),
                    cycles: r.cycles,
                    deleted: r.assets_deleted,
                })
                .collect();
            output::print_list(&rows, format);

            if let Some(stopped) = reports.iter().find(|r| r.status != PurgeStatus::Completed) {
                output::print_warning(&format!(
                    "Purge of '{}' stopped early ({:?}); rerun to continue.",
                    stopped.collection_id, stopped.status
                ));
            }
        }
    }

    Ok(())
}

/// Converts the `--timeout-minutes` value, clamping instead of overflowing.
fn purge_timeout(minutes: u64) -> Duration {
    Duration::from_secs(minutes.saturating_mul(60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purge_timeout_in_minutes() {
        assert_eq!(purge_timeout(90), Duration::from_secs(5400));
    }

    #[test]
    fn test_huge_purge_timeout_saturates() {
        assert_eq!(purge_timeout(u64::MAX), Duration::from_secs(u64::MAX));
    }
}
