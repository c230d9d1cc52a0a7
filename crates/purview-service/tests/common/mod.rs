//! In-memory catalog double shared by the integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use purview_core::error::AppError;
use purview_core::result::AppResult;
use purview_core::traits::CatalogApi;
use purview_core::types::{
    AssetSearchRequest, AssetSearchResponse, AssetSummary, ChildCollectionName,
    ChildCollectionNames, CollectionRecord, CollectionReference, CreateCollectionRequest,
    DataSourceRecord, DataSourceRequest, EntityMutationResponse, StorageAccount,
};
use purview_service::{CollectionService, CollectionSettings, NameGenerator};

pub const API_VERSION: &str = "2019-11-01-preview";

/// One recorded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Children(String),
    Put {
        id: String,
        parent: String,
        friendly_name: String,
    },
    Delete(String),
    Search(String),
    BulkDelete(usize),
    StorageAccount(String),
    PutDataSource(String),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::Put { .. } | Call::Delete(_) | Call::BulkDelete(_) | Call::PutDataSource(_)
        )
    }
}

#[derive(Debug, Default)]
struct State {
    collections: Vec<CollectionRecord>,
    assets: HashMap<String, Vec<String>>,
    calls: Vec<Call>,
    failing_puts: HashSet<String>,
    deny_search: bool,
    search_delay: Option<Duration>,
    appear_on_list: Option<(usize, CollectionRecord)>,
    storage: Option<StorageAccount>,
    data_sources: Vec<(String, DataSourceRequest)>,
}

impl State {
    fn children_of(&self, id: &str) -> Vec<ChildCollectionName> {
        self.collections
            .iter()
            .filter(|c| c.parent_id().is_some_and(|p| p.eq_ignore_ascii_case(id)))
            .map(|c| ChildCollectionName {
                name: c.name.clone(),
                friendly_name: c.friendly_name.clone(),
            })
            .collect()
    }
}

/// A catalog that keeps collections and assets in memory and records
/// every call it receives.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: Mutex<State>,
}

pub fn record(id: &str, friendly_name: &str, parent: Option<&str>) -> CollectionRecord {
    CollectionRecord {
        name: id.to_string(),
        friendly_name: friendly_name.to_string(),
        description: None,
        parent_collection: parent.map(CollectionReference::to),
        collection_provisioning_state: Some("Succeeded".to_string()),
    }
}

impl InMemoryCatalog {
    /// A catalog holding `(id, friendly_name, parent)` rows.
    pub fn with_collections(rows: &[(&str, &str, Option<&str>)]) -> Arc<Self> {
        let catalog = Self::default();
        catalog.lock().collections = rows
            .iter()
            .map(|(id, friendly, parent)| record(id, friendly, *parent))
            .collect();
        Arc::new(catalog)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("catalog state poisoned")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn get(&self, id: &str) -> Option<CollectionRecord> {
        self.lock().collections.iter().find(|c| c.name == id).cloned()
    }

    pub fn ids(&self) -> Vec<String> {
        self.lock().collections.iter().map(|c| c.name.clone()).collect()
    }

    pub fn add_assets(&self, collection: &str, count: usize) {
        let mut state = self.lock();
        let assets = state.assets.entry(collection.to_string()).or_default();
        let start = assets.len();
        assets.extend((start..start + count).map(|i| format!("{collection}-asset-{i}")));
    }

    pub fn asset_count(&self, collection: &str) -> usize {
        self.lock().assets.get(collection).map_or(0, Vec::len)
    }

    pub fn fail_put(&self, id: &str) {
        self.lock().failing_puts.insert(id.to_string());
    }

    pub fn deny_search(&self) {
        self.lock().deny_search = true;
    }

    pub fn delay_search(&self, delay: Duration) {
        self.lock().search_delay = Some(delay);
    }

    /// Inserts `record` right before answering the `nth` listing (1-based).
    pub fn appear_on_list(&self, nth: usize, record: CollectionRecord) {
        self.lock().appear_on_list = Some((nth, record));
    }

    pub fn set_storage_account(&self, account: StorageAccount) {
        self.lock().storage = Some(account);
    }

    pub fn data_sources(&self) -> Vec<(String, DataSourceRequest)> {
        self.lock().data_sources.clone()
    }
}

#[async_trait]
impl CatalogApi for InMemoryCatalog {
    async fn list_collections(&self, _api_version: &str) -> AppResult<Vec<CollectionRecord>> {
        let mut state = self.lock();
        state.calls.push(Call::List);
        let lists = state.calls.iter().filter(|c| **c == Call::List).count();
        let due = matches!(&state.appear_on_list, Some((nth, _)) if *nth == lists);
        if due && let Some((_, record)) = state.appear_on_list.take() {
            state.collections.push(record);
        }
        Ok(state.collections.clone())
    }

    async fn child_collection_names(
        &self,
        id: &str,
        _api_version: &str,
    ) -> AppResult<ChildCollectionNames> {
        let mut state = self.lock();
        state.calls.push(Call::Children(id.to_string()));
        let value = state.children_of(id);
        Ok(ChildCollectionNames {
            count: value.len() as u64,
            value,
        })
    }

    async fn put_collection(
        &self,
        id: &str,
        body: &CreateCollectionRequest,
        _api_version: &str,
    ) -> AppResult<CollectionRecord> {
        let mut state = self.lock();
        state.calls.push(Call::Put {
            id: id.to_string(),
            parent: body.parent_collection.reference_name.clone(),
            friendly_name: body.friendly_name.clone(),
        });
        if state.failing_puts.contains(id) {
            return Err(AppError::transport(format!("PUT {id} failed with 500")));
        }
        let new = record(
            id,
            &body.friendly_name,
            Some(&body.parent_collection.reference_name),
        );
        match state.collections.iter_mut().find(|c| c.name == id) {
            Some(existing) => *existing = new.clone(),
            None => state.collections.push(new.clone()),
        }
        Ok(new)
    }

    async fn delete_collection(&self, id: &str, _api_version: &str) -> AppResult<()> {
        let mut state = self.lock();
        state.calls.push(Call::Delete(id.to_string()));
        if !state.children_of(id).is_empty() {
            return Err(AppError::transport(format!(
                "DELETE {id} failed with 409: collection has children"
            )));
        }
        let before = state.collections.len();
        state.collections.retain(|c| c.name != id);
        if state.collections.len() == before {
            return Err(AppError::transport(format!("DELETE {id} failed with 404")));
        }
        Ok(())
    }

    async fn search_assets(
        &self,
        body: &AssetSearchRequest,
        _api_version: &str,
    ) -> AppResult<AssetSearchResponse> {
        let delay = {
            let mut state = self.lock();
            state.calls.push(Call::Search(body.filter.collection_id.clone()));
            if state.deny_search {
                return Err(AppError::permission_denied("403 Forbidden"));
            }
            state.search_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.lock();
        let value: Vec<AssetSummary> = state
            .assets
            .get(&body.filter.collection_id)
            .into_iter()
            .flatten()
            .take(body.limit as usize)
            .map(|id| AssetSummary {
                id: id.clone(),
                name: None,
                qualified_name: None,
                entity_type: None,
            })
            .collect();
        Ok(AssetSearchResponse {
            search_count: Some(value.len() as u64),
            value,
        })
    }

    async fn bulk_delete_entities(&self, guids: &[String]) -> AppResult<EntityMutationResponse> {
        let mut state = self.lock();
        state.calls.push(Call::BulkDelete(guids.len()));
        let doomed: HashSet<&String> = guids.iter().collect();
        for assets in state.assets.values_mut() {
            assets.retain(|a| !doomed.contains(a));
        }
        Ok(EntityMutationResponse::default())
    }

    async fn storage_account(
        &self,
        _subscription_id: &str,
        _resource_group: &str,
        account_name: &str,
        _api_version: &str,
    ) -> AppResult<StorageAccount> {
        let mut state = self.lock();
        state.calls.push(Call::StorageAccount(account_name.to_string()));
        state
            .storage
            .clone()
            .ok_or_else(|| AppError::transport(format!("GET {account_name} failed with 404")))
    }

    async fn put_data_source(
        &self,
        name: &str,
        body: &DataSourceRequest,
        _api_version: &str,
    ) -> AppResult<DataSourceRecord> {
        let mut state = self.lock();
        state.calls.push(Call::PutDataSource(name.to_string()));
        state.data_sources.push((name.to_string(), body.clone()));
        Ok(DataSourceRecord {
            id: Some(format!("datasources/{name}")),
            name: name.to_string(),
            kind: Some(body.kind.clone()),
            properties: serde_json::to_value(&body.properties).expect("serialize properties"),
        })
    }
}

pub fn settings(verify_before_write: bool) -> CollectionSettings {
    CollectionSettings {
        api_version: API_VERSION.to_string(),
        retry_budget: 5,
        verify_before_write,
    }
}

pub fn names() -> Arc<NameGenerator> {
    Arc::new(NameGenerator::from_seed(Some(7)))
}

pub fn service(catalog: &Arc<InMemoryCatalog>, verify_before_write: bool) -> CollectionService {
    CollectionService::new(catalog.clone(), names(), settings(verify_before_write))
}

pub fn paths(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
