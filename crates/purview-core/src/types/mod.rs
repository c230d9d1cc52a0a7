//! Typed request and response bodies for every REST endpoint used by the
//! workspace. Serialization happens only at the transport boundary.

pub mod asset;
pub mod collection;
pub mod datasource;

pub use asset::{
    AssetFilter, AssetSearchRequest, AssetSearchResponse, AssetSummary, EntityMutationResponse,
};
pub use collection::{
    ChildCollectionName, ChildCollectionNames, CollectionList, CollectionRecord,
    CollectionReference, CreateCollectionRequest,
};
pub use datasource::{DataSourceRecord, DataSourceRequest, StorageAccount};
