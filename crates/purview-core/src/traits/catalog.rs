//! The REST surface of the catalog service as consumed by the service layer.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{
    AssetSearchRequest, AssetSearchResponse, ChildCollectionNames, CollectionRecord,
    CreateCollectionRequest, DataSourceRecord, DataSourceRequest, EntityMutationResponse,
    StorageAccount,
};

/// CRUD access to collections, assets, and data sources.
///
/// The production implementation lives in `purview-client`; tests use an
/// in-memory double. Every call is a single request: no retries happen at
/// this layer, and a 403 is reported as [`ErrorKind::PermissionDenied`].
///
/// [`ErrorKind::PermissionDenied`]: crate::error::ErrorKind::PermissionDenied
#[async_trait]
pub trait CatalogApi: Send + Sync + std::fmt::Debug + 'static {
    /// List every collection visible to the caller.
    async fn list_collections(&self, api_version: &str) -> AppResult<Vec<CollectionRecord>>;

    /// List the direct children of collection `id`.
    async fn child_collection_names(
        &self,
        id: &str,
        api_version: &str,
    ) -> AppResult<ChildCollectionNames>;

    /// Create or update collection `id`.
    async fn put_collection(
        &self,
        id: &str,
        body: &CreateCollectionRequest,
        api_version: &str,
    ) -> AppResult<CollectionRecord>;

    /// Delete collection `id`.
    async fn delete_collection(&self, id: &str, api_version: &str) -> AppResult<()>;

    /// Run a catalog search.
    async fn search_assets(
        &self,
        body: &AssetSearchRequest,
        api_version: &str,
    ) -> AppResult<AssetSearchResponse>;

    /// Delete the given entities in one call.
    async fn bulk_delete_entities(&self, guids: &[String]) -> AppResult<EntityMutationResponse>;

    /// Look up a storage account through Azure Resource Manager.
    async fn storage_account(
        &self,
        subscription_id: &str,
        resource_group: &str,
        account_name: &str,
        api_version: &str,
    ) -> AppResult<StorageAccount>;

    /// Create or update data source `name`.
    async fn put_data_source(
        &self,
        name: &str,
        body: &DataSourceRequest,
        api_version: &str,
    ) -> AppResult<DataSourceRecord>;
}
