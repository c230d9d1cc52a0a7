//! Catalog search and Atlas entity bodies used when purging assets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Filter restricting a search to one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFilter {
    /// Collection id.
    pub collection_id: String,
}

/// Body of `POST /catalog/api/search/query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSearchRequest {
    /// Search keywords; `null` matches everything.
    pub keywords: Option<String>,
    /// Page size (the service caps it at 1000).
    pub limit: u32,
    /// Collection filter.
    pub filter: AssetFilter,
}

impl AssetSearchRequest {
    /// Search for up to `limit` assets in `collection_id`.
    pub fn in_collection(collection_id: impl Into<String>, limit: u32) -> Self {
        Self {
            keywords: None,
            limit,
            filter: AssetFilter {
                collection_id: collection_id.into(),
            },
        }
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    /// Atlas entity guid.
    pub id: String,
    /// Asset display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Fully qualified name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    /// Atlas type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
}

/// Response of a catalog search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetSearchResponse {
    /// Total matches reported by the service.
    #[serde(rename = "@search.count", default, skip_serializing_if = "Option::is_none")]
    pub search_count: Option<u64>,
    /// This page of hits.
    #[serde(default)]
    pub value: Vec<AssetSummary>,
}

/// Header of an entity touched by an Atlas mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasEntityHeader {
    /// Entity guid.
    pub guid: String,
    /// Atlas type name.
    #[serde(default)]
    pub type_name: Option<String>,
}

/// Response of `DELETE /catalog/api/atlas/v2/entity/bulk`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMutationResponse {
    /// Entities keyed by mutation (`"DELETE"`, `"UPDATE"`, ...).
    #[serde(default)]
    pub mutated_entities: HashMap<String, Vec<AtlasEntityHeader>>,
}

impl EntityMutationResponse {
    /// Number of entities the service reports as deleted.
    pub fn deleted_count(&self) -> usize {
        self.mutated_entities.get("DELETE").map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_body_sends_null_keywords() {
        let body = AssetSearchRequest::in_collection("abc123", 1000);
        let value = serde_json::to_value(&body).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "keywords": null,
                "limit": 1000,
                "filter": {"collectionId": "abc123"}
            })
        );
    }

    #[test]
    fn test_deleted_count() {
        let json = r#"{"mutatedEntities":{"DELETE":[{"guid":"g1","typeName":"azure_blob_path"},{"guid":"g2"}]}}"#;
        let resp: EntityMutationResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(resp.deleted_count(), 2);
    }
}
