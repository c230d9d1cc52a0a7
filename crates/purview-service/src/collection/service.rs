//! Collection service: every operation reads a fresh directory snapshot,
//! plans with pure functions, then writes.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use purview_core::config::AppConfig;
use purview_core::error::AppError;
use purview_core::traits::CatalogApi;
use purview_core::types::{ChildCollectionNames, CollectionRecord, CreateCollectionRequest};

use crate::collection::export::RecreateStatement;
use crate::directory::DirectorySnapshot;
use crate::naming::{NameGenerator, NameValidator, is_valid_collection_id};
use crate::reconciler::{HierarchyReconciler, PlannedSegment, SegmentAction, split_path};
use crate::resolver;
use crate::subtree::SubtreeCollector;

/// Tunables for [`CollectionService`].
#[derive(Debug, Clone)]
pub struct CollectionSettings {
    /// `api-version` for the collections endpoints.
    pub api_version: String,
    /// Random ids tried before giving up.
    pub retry_budget: u32,
    /// Re-read the directory before each create.
    pub verify_before_write: bool,
}

impl CollectionSettings {
    /// Settings taken from the loaded configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            api_version: config.api.collections.clone(),
            retry_budget: config.naming.retry_budget,
            verify_before_write: config.collections.verify_before_write,
        }
    }
}

/// Result of creating one path.
#[derive(Debug, Clone, Serialize)]
pub struct PathOutcome {
    /// The path as given.
    pub path: String,
    /// One entry per segment; `Reuse` means nothing was written for it.
    pub segments: Vec<PlannedSegment>,
}

impl PathOutcome {
    /// Ids written by this path.
    pub fn created(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .filter(|s| s.action == SegmentAction::Create)
            .map(|s| s.id.as_str())
    }
}

/// A collection removed by a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedCollection {
    /// Collection id.
    pub id: String,
    /// Display label when known.
    pub friendly_name: Option<String>,
}

/// Result of one recursive delete.
#[derive(Debug, Clone, Serialize)]
pub struct RecursiveDeleteReport {
    /// The resolved root id.
    pub root: String,
    /// Descendants deleted, children before parents.
    pub deleted: Vec<String>,
    /// Whether the root itself was deleted.
    pub root_deleted: bool,
}

/// Manages collections of one account.
#[derive(Debug, Clone)]
pub struct CollectionService {
    /// Catalog client.
    api: Arc<dyn CatalogApi>,
    /// Random id source.
    names: Arc<NameGenerator>,
    /// Tunables.
    settings: CollectionSettings,
}

impl CollectionService {
    /// Creates a new collection service.
    pub fn new(
        api: Arc<dyn CatalogApi>,
        names: Arc<NameGenerator>,
        settings: CollectionSettings,
    ) -> Self {
        Self {
            api,
            names,
            settings,
        }
    }

    /// Uses `api_version` for every collections call.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.settings.api_version = api_version.into();
        self
    }

    /// The collections `api-version` in use.
    pub fn api_version(&self) -> &str {
        &self.settings.api_version
    }

    /// Reads the full directory.
    pub async fn snapshot(&self) -> Result<DirectorySnapshot, AppError> {
        DirectorySnapshot::fetch(self.api.as_ref(), &self.settings.api_version).await
    }

    /// Every collection record, as listed by the service.
    pub async fn list_collections(&self) -> Result<Vec<CollectionRecord>, AppError> {
        self.api.list_collections(&self.settings.api_version).await
    }

    /// Resolves `name` (id or friendly name) to an id.
    pub async fn real_collection_name(
        &self,
        name: &str,
        force_actual: bool,
    ) -> Result<String, AppError> {
        let snapshot = self.snapshot().await?;
        resolver::resolve(name, &snapshot, force_actual)
    }

    /// Explains how `name` resolves without failing on ambiguity.
    pub async fn describe_collection_name(&self, name: &str) -> Result<String, AppError> {
        let snapshot = self.snapshot().await?;
        Ok(resolver::describe(name, &snapshot))
    }

    /// Direct children of `name`.
    pub async fn child_collection_names(
        &self,
        name: &str,
        force_actual: bool,
    ) -> Result<ChildCollectionNames, AppError> {
        let id = self.real_collection_name(name, force_actual).await?;
        self.api
            .child_collection_names(&id, &self.settings.api_version)
            .await
    }

    /// Creates every path in `paths` beneath `start`.
    ///
    /// Paths are slash-delimited friendly names. Each is reconciled against
    /// a fresh snapshot, so later paths see what earlier ones created.
    #[instrument(skip(self, paths), fields(path_count = paths.len()))]
    pub async fn create_collections(
        &self,
        start: &str,
        paths: &[String],
        force_actual: bool,
    ) -> Result<Vec<PathOutcome>, AppError> {
        let segment_lists = paths
            .iter()
            .map(|p| split_path(p))
            .collect::<Result<Vec<_>, _>>()?;

        let start_id = self.real_collection_name(start, force_actual).await?;
        let mut outcomes = Vec::with_capacity(paths.len());
        for (path, segments) in paths.iter().zip(segment_lists) {
            outcomes.push(self.create_path(&start_id, path, &segments).await?);
        }
        Ok(outcomes)
    }

    async fn create_path(
        &self,
        start_id: &str,
        path: &str,
        segments: &[String],
    ) -> Result<PathOutcome, AppError> {
        let snapshot = self.snapshot().await?;
        let validator = NameValidator::new(&self.names, self.settings.retry_budget);
        let plan = HierarchyReconciler::new(&snapshot, validator).reconcile(start_id, segments)?;

        let mut done: Vec<PlannedSegment> = Vec::with_capacity(plan.len());
        for mut segment in plan {
            if segment.action == SegmentAction::Create {
                match self.write_segment(&segment).await {
                    Ok(action) => segment.action = action,
                    Err(e) => {
                        let created: Vec<_> = done
                            .iter()
                            .filter(|s| s.action == SegmentAction::Create)
                            .map(|s| format!("'{}' ({})", s.friendly_name, s.id))
                            .collect();
                        let created = if created.is_empty() {
                            "none".to_string()
                        } else {
                            created.join(", ")
                        };
                        return Err(e.context(format!(
                            "Creating '{path}' stopped at segment '{}'; already created: {created}",
                            segment.friendly_name
                        )));
                    }
                }
            }
            done.push(segment);
        }

        Ok(PathOutcome {
            path: path.to_string(),
            segments: done,
        })
    }

    /// Writes one planned segment, re-checking the live directory first
    /// when configured to.
    async fn write_segment(&self, segment: &PlannedSegment) -> Result<SegmentAction, AppError> {
        if self.settings.verify_before_write {
            let live = self.snapshot().await?;
            if let Some(entry) = live.get(&segment.id) {
                if entry.is_child_of(&segment.parent_id) {
                    info!(collection_id = %segment.id, "Collection appeared since planning, skipping");
                    return Ok(SegmentAction::Reuse);
                }
                return Err(AppError::conflict(format!(
                    "Collection '{}' was created under '{}' since planning; refusing to move it under '{}'",
                    segment.id,
                    entry.parent_id.as_deref().unwrap_or("<none>"),
                    segment.parent_id
                )));
            }
        }

        let body = CreateCollectionRequest::new(&segment.parent_id, &segment.friendly_name);
        self.api
            .put_collection(&segment.id, &body, &self.settings.api_version)
            .await?;

        info!(
            collection_id = %segment.id,
            friendly_name = %segment.friendly_name,
            parent_id = %segment.parent_id,
            "Created collection"
        );
        Ok(SegmentAction::Create)
    }

    /// Writes collection `id` under `parent_id` unless it is already there.
    ///
    /// Used to replay exported hierarchies; ids are taken verbatim.
    #[instrument(skip(self))]
    pub async fn create_or_update(
        &self,
        id: &str,
        friendly_name: &str,
        parent_id: &str,
    ) -> Result<SegmentAction, AppError> {
        if !is_valid_collection_id(id) {
            return Err(AppError::validation(format!(
                "'{id}' is not a valid collection id (3-36 ASCII letters or digits)"
            )));
        }

        let snapshot = self.snapshot().await?;
        if !snapshot.contains(parent_id) {
            return Err(AppError::not_found(format!(
                "Parent collection '{parent_id}' does not exist"
            )));
        }
        if let Some(entry) = snapshot.get(id)
            && entry.is_child_of(parent_id)
        {
            info!(collection_id = %id, "Collection already exists under parent, skipping");
            return Ok(SegmentAction::Reuse);
        }

        let body = CreateCollectionRequest::new(parent_id, friendly_name);
        self.api
            .put_collection(id, &body, &self.settings.api_version)
            .await?;
        info!(collection_id = %id, friendly_name = %friendly_name, parent_id = %parent_id, "Put collection");
        Ok(SegmentAction::Create)
    }

    /// Deletes the leaf collection `name`.
    ///
    /// Fails with a precondition error if it still has children.
    #[instrument(skip(self))]
    pub async fn delete_collection(
        &self,
        name: &str,
        force_actual: bool,
    ) -> Result<DeletedCollection, AppError> {
        let snapshot = self.snapshot().await?;
        let id = resolver::resolve(name, &snapshot, force_actual)?;
        self.delete_leaf(&id).await?;
        Ok(DeletedCollection {
            friendly_name: snapshot.get(&id).map(|e| e.friendly_name.clone()),
            id,
        })
    }

    /// Deletes each of `names`, stopping at the first failure.
    pub async fn delete_collections(
        &self,
        names: &[String],
        force_actual: bool,
    ) -> Result<Vec<DeletedCollection>, AppError> {
        let mut deleted = Vec::with_capacity(names.len());
        for name in names {
            deleted.push(self.delete_collection(name, force_actual).await?);
        }
        Ok(deleted)
    }

    /// Deletes everything beneath each of `names`, children first.
    ///
    /// The named collections themselves are deleted only when
    /// `also_delete_root` is set.
    #[instrument(skip(self, names), fields(roots = names.len()))]
    pub async fn delete_collections_recursively(
        &self,
        names: &[String],
        also_delete_root: bool,
        force_actual: bool,
    ) -> Result<Vec<RecursiveDeleteReport>, AppError> {
        let mut reports = Vec::with_capacity(names.len());
        for name in names {
            let root = self.real_collection_name(name, force_actual).await?;
            let descendants = self.collector().collect(&root).await?;

            let mut deleted = Vec::with_capacity(descendants.len());
            for id in descendants.iter().rev() {
                self.delete_leaf(id)
                    .await
                    .map_err(|e| e.context(format!("Recursive delete of '{root}'")))?;
                deleted.push(id.clone());
            }
            if also_delete_root {
                self.delete_leaf(&root).await?;
            }

            info!(root = %root, deleted = deleted.len(), root_deleted = also_delete_root, "Deleted subtree");
            reports.push(RecursiveDeleteReport {
                root,
                deleted,
                root_deleted: also_delete_root,
            });
        }
        Ok(reports)
    }

    /// Statements that recreate the subtree beneath `name`, parents first.
    ///
    /// With `include_root`, the root itself is exported too. Nothing is
    /// written.
    pub async fn export_subtree(
        &self,
        name: &str,
        include_root: bool,
        force_actual: bool,
    ) -> Result<Vec<RecreateStatement>, AppError> {
        let root = self.real_collection_name(name, force_actual).await?;
        let descendants = self.collector().collect(&root).await?;
        let snapshot = self.snapshot().await?;

        let ids = include_root
            .then_some(&root)
            .into_iter()
            .chain(descendants.iter());

        let mut statements = Vec::with_capacity(descendants.len() + 1);
        for id in ids {
            match snapshot.get(id) {
                Some(entry) => match &entry.parent_id {
                    Some(parent_id) => statements.push(RecreateStatement {
                        id: id.clone(),
                        friendly_name: entry.friendly_name.clone(),
                        parent_id: parent_id.clone(),
                    }),
                    None => warn!(collection_id = %id, "Account root cannot be exported"),
                },
                None => warn!(collection_id = %id, "Collection vanished during export"),
            }
        }
        Ok(statements)
    }

    fn collector(&self) -> SubtreeCollector<'_> {
        SubtreeCollector::new(self.api.as_ref(), &self.settings.api_version)
    }

    /// Deletes `id` after confirming it has no live children.
    async fn delete_leaf(&self, id: &str) -> Result<(), AppError> {
        let children = self
            .api
            .child_collection_names(id, &self.settings.api_version)
            .await?;
        let count = children.count.max(children.value.len() as u64);
        if count > 0 {
            return Err(AppError::precondition(format!(
                "Collection '{id}' still has {count} child collection(s); \
                 delete them first or use the recursive delete"
            )));
        }

        self.api
            .delete_collection(id, &self.settings.api_version)
            .await?;
        info!(collection_id = %id, "Deleted collection");
        Ok(())
    }
}
