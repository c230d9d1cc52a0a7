//! `reqwest` implementation of the catalog REST surface.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use purview_core::config::AppConfig;
use purview_core::error::{AppError, ErrorKind};
use purview_core::result::AppResult;
use purview_core::traits::{CatalogApi, TokenProvider};
use purview_core::types::{
    AssetSearchRequest, AssetSearchResponse, ChildCollectionNames, CollectionList,
    CollectionRecord, CreateCollectionRequest, DataSourceRecord, DataSourceRequest,
    EntityMutationResponse, StorageAccount,
};

/// Which REST surface a request targets; decides the token scope and the
/// role named in permission errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Surface {
    Collections,
    Catalog,
    DataSources,
    Management,
}

impl Surface {
    fn required_role(self) -> &'static str {
        match self {
            Self::Collections => {
                "The caller must be a Collection Admin on the collection (or one of its parents)"
            }
            Self::Catalog => "The caller must be a Data Curator on the collection",
            Self::DataSources => "The caller must be a Data Source Admin on the collection",
            Self::Management => "The caller needs Reader access on the storage account",
        }
    }
}

/// Catalog client issuing one bearer-authenticated HTTP request per call.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    /// Shared connection pool.
    http: Client,
    /// Account base URL, e.g. `https://contoso.purview.azure.com`.
    base_url: String,
    /// Azure Resource Manager base URL.
    management_url: String,
    /// Source of bearer tokens.
    credential: Arc<dyn TokenProvider>,
    /// Scope for catalog calls.
    catalog_scope: String,
    /// Scope for ARM calls.
    management_scope: String,
}

impl HttpCatalogClient {
    /// Creates a client for the account described by `config`.
    pub fn new(config: &AppConfig, credential: Arc<dyn TokenProvider>) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(config.http.connect_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to create HTTP client: {e}"),
                    e,
                )
            })?;

        Ok(Self {
            http,
            base_url: config.account.base_url(),
            management_url: config
                .account
                .management_endpoint
                .trim_end_matches('/')
                .to_string(),
            credential,
            catalog_scope: config.auth.catalog_scope.clone(),
            management_scope: config.auth.management_scope.clone(),
        })
    }

    fn collections_url(&self) -> String {
        format!("{}/account/collections", self.base_url)
    }

    fn catalog_url(&self) -> String {
        format!("{}/catalog", self.base_url)
    }

    /// Attaches the bearer token, sends, and maps non-success statuses.
    async fn execute(
        &self,
        builder: RequestBuilder,
        surface: Surface,
        action: &str,
    ) -> AppResult<Response> {
        let scope = match surface {
            Surface::Management => &self.management_scope,
            _ => &self.catalog_scope,
        };
        let token = self.credential.access_token(scope).await?;

        let response = builder.bearer_auth(token).send().await.map_err(|e| {
            AppError::with_source(ErrorKind::Transport, format!("{action} failed: {e}"), e)
        })?;

        let status = response.status();
        debug!(action, %status, "Catalog response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::FORBIDDEN {
            return Err(AppError::permission_denied(format!(
                "{action} was refused (403). {}. Response: {body}",
                surface.required_role()
            )));
        }

        Err(AppError::transport(format!("{action} failed ({status}): {body}")))
    }

    async fn parse<T: DeserializeOwned>(response: Response, action: &str) -> AppResult<T> {
        let bytes = response.bytes().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Transport,
                format!("Failed to read {action} response: {e}"),
                e,
            )
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Failed to parse {action} response: {e}"),
                e,
            )
        })
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn list_collections(&self, api_version: &str) -> AppResult<Vec<CollectionRecord>> {
        let request = self
            .http
            .get(self.collections_url())
            .query(&[("api-version", api_version)]);
        let response = self
            .execute(request, Surface::Collections, "Listing collections")
            .await?;
        let list: CollectionList = Self::parse(response, "collection listing").await?;
        Ok(list.value)
    }

    async fn child_collection_names(
        &self,
        id: &str,
        api_version: &str,
    ) -> AppResult<ChildCollectionNames> {
        let url = format!("{}/{id}/getChildCollectionNames", self.collections_url());
        let request = self.http.get(url).query(&[("api-version", api_version)]);
        let response = self
            .execute(request, Surface::Collections, "Listing child collections")
            .await?;
        Self::parse(response, "child collection").await
    }

    async fn put_collection(
        &self,
        id: &str,
        body: &CreateCollectionRequest,
        api_version: &str,
    ) -> AppResult<CollectionRecord> {
        let url = format!("{}/{id}", self.collections_url());
        let request = self
            .http
            .put(url)
            .query(&[("api-version", api_version)])
            .json(body);
        let response = self
            .execute(request, Surface::Collections, "Creating collection")
            .await?;
        Self::parse(response, "collection create").await
    }

    async fn delete_collection(&self, id: &str, api_version: &str) -> AppResult<()> {
        let url = format!("{}/{id}", self.collections_url());
        let request = self.http.delete(url).query(&[("api-version", api_version)]);
        self.execute(request, Surface::Collections, "Deleting collection")
            .await?;
        Ok(())
    }

    async fn search_assets(
        &self,
        body: &AssetSearchRequest,
        api_version: &str,
    ) -> AppResult<AssetSearchResponse> {
        let url = format!("{}/api/search/query", self.catalog_url());
        let request = self
            .http
            .post(url)
            .query(&[("api-version", api_version)])
            .json(body);
        let response = self
            .execute(request, Surface::Catalog, "Searching assets")
            .await?;
        Self::parse(response, "asset search").await
    }

    async fn bulk_delete_entities(&self, guids: &[String]) -> AppResult<EntityMutationResponse> {
        let url = format!("{}/api/atlas/v2/entity/bulk", self.catalog_url());
        let params: Vec<(&str, &str)> = guids.iter().map(|g| ("guid", g.as_str())).collect();
        let request = self.http.delete(url).query(&params);
        let response = self
            .execute(request, Surface::Catalog, "Deleting assets")
            .await?;
        Self::parse(response, "bulk delete").await
    }

    async fn storage_account(
        &self,
        subscription_id: &str,
        resource_group: &str,
        account_name: &str,
        api_version: &str,
    ) -> AppResult<StorageAccount> {
        let url = format!(
            "{}/subscriptions/{subscription_id}/resourceGroups/{resource_group}/providers/Microsoft.Storage/storageAccounts/{account_name}",
            self.management_url
        );
        let request = self.http.get(url).query(&[("api-version", api_version)]);
        let response = self
            .execute(request, Surface::Management, "Reading storage account")
            .await?;
        Self::parse(response, "storage account").await
    }

    async fn put_data_source(
        &self,
        name: &str,
        body: &DataSourceRequest,
        api_version: &str,
    ) -> AppResult<DataSourceRecord> {
        let url = format!("{}/scan/datasources/{name}", self.base_url);
        let request = self
            .http
            .put(url)
            .query(&[("api-version", api_version)])
            .json(body);
        let response = self
            .execute(request, Surface::DataSources, "Registering data source")
            .await?;
        Self::parse(response, "data source").await
    }
}
