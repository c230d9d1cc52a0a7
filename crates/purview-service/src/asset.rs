//! Bulk deletion of every asset in a collection.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use purview_core::config::AppConfig;
use purview_core::error::{AppError, ErrorKind};
use purview_core::traits::CatalogApi;
use purview_core::types::AssetSearchRequest;

use crate::collection::CollectionService;

/// How a purge ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PurgeStatus {
    /// A search came back empty.
    Completed,
    /// The deadline passed first.
    TimedOut,
    /// The cancellation token fired first.
    Cancelled,
}

/// Result of purging one collection.
#[derive(Debug, Clone, Serialize)]
pub struct PurgeReport {
    /// The resolved collection id.
    pub collection_id: String,
    /// How the loop ended.
    pub status: PurgeStatus,
    /// Search-then-delete cycles that deleted something.
    pub cycles: u32,
    /// Assets submitted for deletion.
    pub assets_deleted: u64,
}

/// Repeatedly searches a collection and bulk-deletes what it finds.
#[derive(Debug, Clone)]
pub struct AssetPurger {
    /// Catalog client.
    api: Arc<dyn CatalogApi>,
    /// Resolves collection names.
    collections: Arc<CollectionService>,
    /// `api-version` for the search endpoint.
    api_version: String,
    /// Assets per cycle.
    batch_size: u32,
}

impl AssetPurger {
    /// Creates a new purger.
    pub fn new(
        api: Arc<dyn CatalogApi>,
        collections: Arc<CollectionService>,
        api_version: impl Into<String>,
        batch_size: u32,
    ) -> Self {
        Self {
            api,
            collections,
            api_version: api_version.into(),
            batch_size,
        }
    }

    /// A purger using the configured search version and batch size.
    pub fn from_config(
        api: Arc<dyn CatalogApi>,
        collections: Arc<CollectionService>,
        config: &AppConfig,
    ) -> Self {
        Self::new(api, collections, &config.api.catalog, config.assets.batch_size)
    }

    /// Deletes every asset in `name` until none remain.
    ///
    /// Stops early when `timeout` elapses or `cancel` fires. In-flight
    /// requests are abandoned at that point; the report still counts every
    /// batch that was acknowledged.
    #[instrument(skip(self, cancel))]
    pub async fn purge(
        &self,
        name: &str,
        force_actual: bool,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<PurgeReport, AppError> {
        let collection_id = self.collections.real_collection_name(name, force_actual).await?;
        let deadline = Instant::now() + timeout;
        let mut report = PurgeReport {
            collection_id: collection_id.clone(),
            status: PurgeStatus::Completed,
            cycles: 0,
            assets_deleted: 0,
        };

        loop {
            let request = AssetSearchRequest::in_collection(&collection_id, self.batch_size);
            let page = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(report.finish(PurgeStatus::Cancelled)),
                _ = sleep_until(deadline) => return Ok(report.finish(PurgeStatus::TimedOut)),
                page = self.api.search_assets(&request, &self.api_version) => {
                    page.map_err(data_curator_hint)?
                }
            };

            if page.value.is_empty() {
                return Ok(report.finish(PurgeStatus::Completed));
            }

            let guids: Vec<String> = page.value.into_iter().map(|a| a.id).collect();
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(report.finish(PurgeStatus::Cancelled)),
                _ = sleep_until(deadline) => return Ok(report.finish(PurgeStatus::TimedOut)),
                result = self.api.bulk_delete_entities(&guids) => {
                    result.map_err(data_curator_hint)?;
                }
            }

            report.cycles += 1;
            report.assets_deleted += guids.len() as u64;
            info!(
                collection_id = %collection_id,
                cycle = report.cycles,
                batch = guids.len(),
                total = report.assets_deleted,
                "Deleted asset batch"
            );
        }
    }

    /// Purges each of `names` in turn, sharing one deadline and token.
    ///
    /// Stops at the first collection that does not complete.
    pub async fn purge_all(
        &self,
        names: &[String],
        force_actual: bool,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<Vec<PurgeReport>, AppError> {
        let deadline = Instant::now() + timeout;
        let mut reports = Vec::with_capacity(names.len());
        for name in names {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let report = self
                .purge(name, force_actual, remaining, cancel.clone())
                .await?;
            let done = report.status == PurgeStatus::Completed;
            reports.push(report);
            if !done {
                break;
            }
        }
        Ok(reports)
    }
}

impl PurgeReport {
    fn finish(mut self, status: PurgeStatus) -> Self {
        match status {
            PurgeStatus::Completed => info!(
                collection_id = %self.collection_id,
                deleted = self.assets_deleted,
                "Asset purge completed"
            ),
            _ => warn!(
                collection_id = %self.collection_id,
                deleted = self.assets_deleted,
                ?status,
                "Asset purge stopped early"
            ),
        }
        self.status = status;
        self
    }
}

fn data_curator_hint(err: AppError) -> AppError {
    if err.is(ErrorKind::PermissionDenied) {
        err.context("Deleting assets requires the Data Curator role on the collection")
    } else {
        err
    }
}
