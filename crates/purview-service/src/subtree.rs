//! Breadth-first discovery of every collection beneath a root.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, instrument};

use purview_core::error::AppError;
use purview_core::traits::CatalogApi;

/// Walks the live child listings beneath a collection.
#[derive(Debug, Clone, Copy)]
pub struct SubtreeCollector<'a> {
    api: &'a dyn CatalogApi,
    api_version: &'a str,
}

impl<'a> SubtreeCollector<'a> {
    /// Creates a collector issuing child-listing calls through `api`.
    pub fn new(api: &'a dyn CatalogApi, api_version: &'a str) -> Self {
        Self { api, api_version }
    }

    /// Every descendant id of `root`, breadth-first in discovery order.
    ///
    /// `root` itself is excluded; a leaf yields an empty vector. Every
    /// parent precedes its descendants, so consuming the list in reverse
    /// visits children before parents.
    #[instrument(skip(self))]
    pub async fn collect(&self, root: &str) -> Result<Vec<String>, AppError> {
        let mut found = Vec::new();
        let mut seen = HashSet::from([root.to_string()]);
        let mut queue = VecDeque::from([root.to_string()]);

        while let Some(id) = queue.pop_front() {
            let children = self
                .api
                .child_collection_names(&id, self.api_version)
                .await
                .map_err(|e| e.context(format!("Listing children of '{id}'")))?;

            for child in children.value {
                if seen.insert(child.name.clone()) {
                    queue.push_back(child.name.clone());
                    found.push(child.name);
                }
            }
        }

        debug!(root = %root, descendants = found.len(), "Collected subtree");
        Ok(found)
    }
}
