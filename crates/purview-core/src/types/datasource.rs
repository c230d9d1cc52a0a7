//! Data-source registration and storage account lookup bodies.

use serde::{Deserialize, Serialize};

use super::collection::CollectionReference;

/// Properties of an ADLS Gen2 data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdlsGen2Properties {
    /// The account's DFS endpoint.
    pub endpoint: String,
    /// Owning subscription.
    pub subscription_id: String,
    /// Owning resource group.
    pub resource_group: String,
    /// Azure region.
    pub location: String,
    /// Storage account name.
    pub resource_name: String,
    /// Full ARM resource id.
    pub resource_id: String,
    /// Collection the source is registered under.
    pub collection: CollectionReference,
}

/// Body of `PUT /scan/datasources/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceRequest {
    /// Source kind; always `"AdlsGen2"` here.
    pub kind: String,
    /// Nickname shown in the catalog.
    pub name: String,
    /// Kind-specific properties.
    pub properties: AdlsGen2Properties,
}

/// A registered data source as echoed by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceRecord {
    /// Resource id.
    #[serde(default)]
    pub id: Option<String>,
    /// Source name.
    pub name: String,
    /// Source kind.
    #[serde(default)]
    pub kind: Option<String>,
    /// Raw properties.
    #[serde(default)]
    pub properties: serde_json::Value,
}

/// Endpoints block of a storage account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryEndpoints {
    /// Data Lake (DFS) endpoint.
    #[serde(default)]
    pub dfs: Option<String>,
}

/// Properties block of a storage account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountProperties {
    /// Service endpoints.
    #[serde(default)]
    pub primary_endpoints: PrimaryEndpoints,
}

/// Subset of the ARM storage account resource needed for registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageAccount {
    /// Full ARM resource id.
    pub id: String,
    /// Azure region.
    pub location: String,
    /// Properties.
    #[serde(default)]
    pub properties: StorageAccountProperties,
}
