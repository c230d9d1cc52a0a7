//! Collection management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use purview_core::error::AppError;
use purview_service::{CollectionService, SegmentAction};

use super::Services;
use crate::output::{self, OutputFormat};

/// Arguments for collection commands
#[derive(Debug, Args)]
pub struct CollectionsArgs {
    /// Override the collections api-version
    #[arg(long)]
    pub api_version: Option<String>,

    /// Use a name as a literal id when it also matches friendly names
    #[arg(long, global = true)]
    pub force_actual_name: bool,

    /// Collection subcommand
    #[command(subcommand)]
    pub command: CollectionsCommand,
}

/// Collection subcommands
#[derive(Debug, Subcommand)]
pub enum CollectionsCommand {
    /// List every collection
    List {
        /// Show only ids and friendly names
        #[arg(long)]
        only_names: bool,
    },
    /// List the direct children of a collection
    Children {
        /// Collection id or friendly name
        name: String,
    },
    /// Resolve a name to a collection id
    Resolve {
        /// Collection id or friendly name
        name: String,
        /// Explain the result instead of failing on ambiguity
        #[arg(long)]
        describe: bool,
    },
    /// Create one or more collection paths
    Create {
        /// Existing collection to create beneath
        #[arg(short, long)]
        start: String,
        /// Slash-delimited paths of friendly names, e.g. "Finance/Q1 2024"
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Create or update one collection with an exact id
    Put {
        /// Collection id
        #[arg(long)]
        id: String,
        /// Display label
        #[arg(long)]
        friendly_name: String,
        /// Parent collection id
        #[arg(long)]
        parent: String,
    },
    /// Delete collections
    Delete {
        /// Collection ids or friendly names
        #[arg(required = true)]
        names: Vec<String>,
        /// Delete every descendant first
        #[arg(short, long)]
        recursive: bool,
        /// With --recursive, also delete the named collections
        #[arg(long, requires = "recursive")]
        include_root: bool,
        /// Print recreation commands before deleting
        #[arg(long)]
        safe: bool,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Print commands that recreate a subtree
    Export {
        /// Collection id or friendly name
        name: String,
        /// Include the collection itself
        #[arg(long)]
        include_root: bool,
    },
}

/// Collection display row
#[derive(Debug, Serialize, Tabled)]
struct CollectionRow {
    /// Collection id
    id: String,
    /// Friendly name
    friendly_name: String,
    /// Parent id
    parent: String,
    /// Provisioning state
    state: String,
}

/// Id and friendly name only
#[derive(Debug, Serialize, Tabled)]
struct NameRow {
    /// Collection id
    id: String,
    /// Friendly name
    friendly_name: String,
}

/// One segment of a created path
#[derive(Debug, Serialize, Tabled)]
struct SegmentRow {
    /// Path as given
    path: String,
    /// Collection id
    id: String,
    /// Friendly name
    friendly_name: String,
    /// Parent id
    parent: String,
    /// Created or already present
    action: String,
}

/// Execute collection commands
pub async fn execute(
    args: &CollectionsArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), AppError> {
    let svc: CollectionService = match &args.api_version {
        Some(v) => services.collections.as_ref().clone().with_api_version(v),
        None => services.collections.as_ref().clone(),
    };
    let force = args.force_actual_name;

    match &args.command {
        CollectionsCommand::List { only_names } => {
            let records = svc.list_collections().await?;
            if *only_names {
                let rows: Vec<NameRow> = records
                    .into_iter()
                    .map(|r| NameRow {
                        id: r.name,
                        friendly_name: r.friendly_name,
                    })
                    .collect();
                output::print_list(&rows, format);
            } else {
                let rows: Vec<CollectionRow> = records
                    .into_iter()
                    .map(|r| CollectionRow {
                        parent: r.parent_id().unwrap_or("-").to_string(),
                        state: r.collection_provisioning_state.unwrap_or_default(),
                        id: r.name,
                        friendly_name: r.friendly_name,
                    })
                    .collect();
                output::print_list(&rows, format);
            }
        }
        CollectionsCommand::Children { name } => {
            let children = svc.child_collection_names(name, force).await?;
            let rows: Vec<NameRow> = children
                .value
                .into_iter()
                .map(|c| NameRow {
                    id: c.name,
                    friendly_name: c.friendly_name,
                })
                .collect();
            output::print_list(&rows, format);
        }
        CollectionsCommand::Resolve { name, describe } => {
            let text = if *describe {
                svc.describe_collection_name(name).await?
            } else {
                svc.real_collection_name(name, force).await?
            };
            output::print_item(&text, format, |t| println!("{t}"));
        }
        CollectionsCommand::Create { start, paths } => {
            let outcomes = svc.create_collections(start, paths, force).await?;
            let rows: Vec<SegmentRow> = outcomes
                .iter()
                .flat_map(|o| {
                    o.segments.iter().map(|s| SegmentRow {
                        path: o.path.clone(),
                        id: s.id.clone(),
                        friendly_name: s.friendly_name.clone(),
                        parent: s.parent_id.clone(),
                        action: match s.action {
                            SegmentAction::Create => "created".to_string(),
                            SegmentAction::Reuse => "exists".to_string(),
                        },
                    })
                })
                .collect();
            output::print_list(&rows, format);
        }
        CollectionsCommand::Put {
            id,
            friendly_name,
            parent,
        } => match svc.create_or_update(id, friendly_name, parent).await? {
            SegmentAction::Create => output::print_success(&format!("Collection '{id}' written.")),
            SegmentAction::Reuse => {
                output::print_warning(&format!("Collection '{id}' already exists under '{parent}'."))
            }
        },
        CollectionsCommand::Delete {
            names,
            recursive,
            include_root,
            safe,
            yes,
        } => {
            if *safe {
                for name in names {
                    print_export(&svc, name, *include_root || !*recursive, force).await?;
                }
            }

            if !*yes && !confirm(names, *recursive)? {
                println!("Cancelled.");
                return Ok(());
            }

            if *recursive {
                let reports = svc
                    .delete_collections_recursively(names, *include_root, force)
                    .await?;
                output::print_item(&reports, format, |reports| {
                    for r in reports {
                        output::print_success(&format!(
                            "Deleted {} descendant(s) of '{}'{}.",
                            r.deleted.len(),
                            r.root,
                            if r.root_deleted { " and the collection itself" } else { "" }
                        ));
                    }
                });
            } else {
                let deleted = svc.delete_collections(names, force).await?;
                output::print_item(&deleted, format, |deleted| {
                    for d in deleted {
                        output::print_success(&format!(
                            "Deleted collection '{}' ({}).",
                            d.friendly_name.as_deref().unwrap_or("?"),
                            d.id
                        ));
                    }
                });
            }
        }
        CollectionsCommand::Export { name, include_root } => {
            let statements = svc.export_subtree(name, *include_root, force).await?;
            output::print_item(&statements, format, |statements| {
                for s in statements {
                    println!("{s}");
                }
            });
        }
    }

    Ok(())
}

async fn print_export(
    svc: &CollectionService,
    name: &str,
    include_root: bool,
    force: bool,
) -> Result<(), AppError> {
    let statements = svc.export_subtree(name, include_root, force).await?;
    println!("# Recreate '{name}':");
    for s in &statements {
        println!("{s}");
    }
    Ok(())
}

fn confirm(names: &[String], recursive: bool) -> Result<bool, AppError> {
    let scope = if recursive { "and everything beneath " } else { "" };
    dialoguer::Confirm::new()
        .with_prompt(format!("Delete {scope}{}?", names.join(", ")))
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
