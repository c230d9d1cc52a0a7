//! Request-scoped snapshot of every collection in the account.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, instrument};

use purview_core::error::{AppError, NameCandidate};
use purview_core::traits::CatalogApi;
use purview_core::types::CollectionRecord;

/// What the snapshot knows about one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionEntry {
    /// Display label.
    pub friendly_name: String,
    /// Parent id; `None` only for the account root.
    pub parent_id: Option<String>,
}

impl CollectionEntry {
    /// Whether this entry hangs directly under `parent`.
    ///
    /// Parent ids compare ASCII case-insensitively.
    pub fn is_child_of(&self, parent: &str) -> bool {
        self.parent_id
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case(parent))
    }
}

/// Read-only map from collection id to [`CollectionEntry`].
///
/// Built once per top-level operation and never mutated. Iteration follows
/// the order in which the service listed the collections.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    entries: Vec<(String, CollectionEntry)>,
    index: HashMap<String, usize>,
}

impl DirectorySnapshot {
    /// Fetches the full collection listing.
    ///
    /// One request, no retries. A 403 surfaces as a permission-denied error.
    #[instrument(skip(api))]
    pub async fn fetch(api: &dyn CatalogApi, api_version: &str) -> Result<Self, AppError> {
        let records = api.list_collections(api_version).await?;
        let snapshot = Self::from_records(records);
        debug!(collections = snapshot.len(), "Fetched collection directory");
        Ok(snapshot)
    }

    /// Indexes a listing.
    pub fn from_records(records: impl IntoIterator<Item = CollectionRecord>) -> Self {
        Self::from_entries(records.into_iter().map(|record| {
            let entry = CollectionEntry {
                parent_id: record.parent_id().map(str::to_string),
                friendly_name: record.friendly_name,
            };
            (record.name, entry)
        }))
    }

    /// Indexes `(id, entry)` pairs. A repeated id keeps its first position
    /// and its last entry.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, CollectionEntry)>) -> Self {
        let mut snapshot = Self::default();
        for (id, entry) in entries {
            match snapshot.index.get(&id) {
                Some(&pos) => snapshot.entries[pos].1 = entry,
                None => {
                    snapshot.index.insert(id.clone(), snapshot.entries.len());
                    snapshot.entries.push((id, entry));
                }
            }
        }
        snapshot
    }

    /// Number of collections.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the account has no collections at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `id` is a known collection id.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Entry for `id`.
    pub fn get(&self, id: &str) -> Option<&CollectionEntry> {
        self.index.get(id).map(|&pos| &self.entries[pos].1)
    }

    /// All `(id, entry)` pairs in listing order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CollectionEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Collections whose friendly name is exactly `name`, in listing order.
    pub fn friendly_matches(&self, name: &str) -> Vec<(&str, &CollectionEntry)> {
        self.iter()
            .filter(|(_, entry)| entry.friendly_name == name)
            .collect()
    }

    /// Friendly name of `id`'s parent, if both exist.
    pub fn parent_friendly_name(&self, id: &str) -> Option<&str> {
        let parent = self.get(id)?.parent_id.as_deref()?;
        self.get(parent).map(|p| p.friendly_name.as_str())
    }

    /// Disambiguation record for `id`.
    pub fn candidate(&self, id: &str) -> Option<NameCandidate> {
        self.get(id).map(|entry| NameCandidate {
            id: id.to_string(),
            friendly_name: entry.friendly_name.clone(),
            parent_friendly_name: self.parent_friendly_name(id).map(str::to_string),
        })
    }
}
