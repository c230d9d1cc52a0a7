//! Collection resources under `/account/collections`.

use serde::{Deserialize, Serialize};

/// Reference from a collection (or data source) to a collection id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionReference {
    /// Id of the referenced collection.
    pub reference_name: String,
    /// Reference type tag (`"CollectionReference"`), omitted on collection writes.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl CollectionReference {
    /// A bare reference, as sent in collection create bodies.
    pub fn to(id: impl Into<String>) -> Self {
        Self {
            reference_name: id.into(),
            kind: None,
        }
    }

    /// A typed reference, as sent in data-source bodies.
    pub fn typed(id: impl Into<String>) -> Self {
        Self {
            reference_name: id.into(),
            kind: Some("CollectionReference".to_string()),
        }
    }
}

/// A collection as returned by the listing and create endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    /// Immutable collection id.
    pub name: String,
    /// Display label.
    #[serde(default)]
    pub friendly_name: String,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parent reference; absent only on the account root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_collection: Option<CollectionReference>,
    /// Provisioning state reported by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_provisioning_state: Option<String>,
}

impl CollectionRecord {
    /// Id of the parent collection, if any.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_collection
            .as_ref()
            .map(|p| p.reference_name.as_str())
    }
}

/// Body of `GET /account/collections`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionList {
    /// Every collection visible to the caller.
    #[serde(default)]
    pub value: Vec<CollectionRecord>,
    /// Continuation link; not issued by the service in practice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
}

/// One entry of `getChildCollectionNames`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildCollectionName {
    /// Child collection id.
    pub name: String,
    /// Child display label.
    #[serde(default)]
    pub friendly_name: String,
}

/// Body of `GET /account/collections/{id}/getChildCollectionNames`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildCollectionNames {
    /// Number of direct children.
    #[serde(default)]
    pub count: u64,
    /// The direct children.
    #[serde(default)]
    pub value: Vec<ChildCollectionName>,
}

/// Body of `PUT /account/collections/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionRequest {
    /// The collection to nest under.
    pub parent_collection: CollectionReference,
    /// Display label.
    pub friendly_name: String,
}

impl CreateCollectionRequest {
    /// Builds a create body for `friendly_name` under `parent_id`.
    pub fn new(parent_id: impl Into<String>, friendly_name: impl Into<String>) -> Self {
        Self {
            parent_collection: CollectionReference::to(parent_id),
            friendly_name: friendly_name.into(),
        }
    }
}
