//! Registration of ADLS Gen2 storage accounts as catalog data sources.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use purview_core::config::AppConfig;
use purview_core::config::account::ApiVersions;
use purview_core::error::AppError;
use purview_core::traits::CatalogApi;
use purview_core::types::datasource::AdlsGen2Properties;
use purview_core::types::{CollectionReference, DataSourceRecord, DataSourceRequest};

use crate::collection::CollectionService;
use crate::naming::NameGenerator;

/// Length of the random suffix on a generated nickname.
const NICKNAME_SUFFIX_LEN: usize = 4;

/// Request to register a data lake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDataSource {
    /// Storage account name.
    pub data_lake_name: String,
    /// Owning subscription.
    pub subscription_id: String,
    /// Owning resource group.
    pub resource_group: String,
    /// Collection (id or friendly name) to register under.
    pub collection: String,
    /// Display name; defaults to `{data_lake_name}-xxxx`.
    pub nickname: Option<String>,
}

/// Registers data sources under collections.
#[derive(Debug, Clone)]
pub struct DataSourceService {
    /// Catalog and management client.
    api: Arc<dyn CatalogApi>,
    /// Resolves collection names.
    collections: Arc<CollectionService>,
    /// Nickname suffix source.
    names: Arc<NameGenerator>,
    /// `api-version` for the scan endpoints.
    scan_api_version: String,
    /// `api-version` for the storage resource provider.
    storage_api_version: String,
}

impl DataSourceService {
    /// Creates a new data-source service.
    pub fn new(
        api: Arc<dyn CatalogApi>,
        collections: Arc<CollectionService>,
        names: Arc<NameGenerator>,
        versions: &ApiVersions,
    ) -> Self {
        Self {
            api,
            collections,
            names,
            scan_api_version: versions.scan.clone(),
            storage_api_version: versions.storage.clone(),
        }
    }

    /// A service using the configured `api-version` values.
    pub fn from_config(
        api: Arc<dyn CatalogApi>,
        collections: Arc<CollectionService>,
        names: Arc<NameGenerator>,
        config: &AppConfig,
    ) -> Self {
        Self::new(api, collections, names, &config.api)
    }

    /// Looks up the storage account and registers it under the collection.
    #[instrument(skip(self), fields(data_lake = %req.data_lake_name))]
    pub async fn register_data_source(
        &self,
        req: RegisterDataSource,
    ) -> Result<DataSourceRecord, AppError> {
        let account = self
            .api
            .storage_account(
                &req.subscription_id,
                &req.resource_group,
                &req.data_lake_name,
                &self.storage_api_version,
            )
            .await
            .map_err(|e| e.context(format!("Looking up storage account '{}'", req.data_lake_name)))?;

        let endpoint = account.properties.primary_endpoints.dfs.ok_or_else(|| {
            AppError::validation(format!(
                "Storage account '{}' has no Data Lake endpoint; enable the hierarchical namespace",
                req.data_lake_name
            ))
        })?;

        let collection_id = self
            .collections
            .real_collection_name(&req.collection, false)
            .await?;

        let nickname = match req.nickname.filter(|n| !n.trim().is_empty()) {
            Some(nickname) => nickname,
            None => format!(
                "{}-{}",
                req.data_lake_name,
                self.names.lowercase(NICKNAME_SUFFIX_LEN)
            ),
        };

        let body = DataSourceRequest {
            kind: "AdlsGen2".to_string(),
            name: nickname,
            properties: AdlsGen2Properties {
                endpoint,
                subscription_id: req.subscription_id,
                resource_group: req.resource_group,
                location: account.location,
                resource_name: req.data_lake_name.clone(),
                resource_id: account.id,
                collection: CollectionReference::typed(&collection_id),
            },
        };

        let record = self
            .api
            .put_data_source(&req.data_lake_name, &body, &self.scan_api_version)
            .await?;
        info!(
            data_source = %req.data_lake_name,
            nickname = %body.name,
            collection_id = %collection_id,
            "Registered data source"
        );
        Ok(record)
    }
}
