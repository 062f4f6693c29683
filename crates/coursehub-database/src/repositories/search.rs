//! Raw document reads for advanced search.

use std::sync::Arc;

use coursehub_core::result::AppResult;
use coursehub_core::traits::{Document, DocumentStore};
use coursehub_core::types::{Collection, PaginationWindow, Predicate};

/// Reads documents of any collection by predicate.
#[derive(Debug, Clone)]
pub struct SearchRepository {
    store: Arc<dyn DocumentStore>,
}

impl SearchRepository {
    /// Create a new search repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Documents of `collection` matching `filter`, windowed.
    pub async fn search(
        &self,
        collection: Collection,
        filter: &Predicate,
        window: PaginationWindow,
    ) -> AppResult<Vec<Document>> {
        self.store.find(collection, filter, Some(window)).await
    }
}
