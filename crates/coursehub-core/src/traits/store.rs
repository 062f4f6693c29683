//! Document store trait for pluggable storage backends.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::query::pipeline::Pipeline;
use crate::result::AppResult;
use crate::types::collection::Collection;
use crate::types::filter::Predicate;
use crate::types::id::EntityId;
use crate::types::pagination::PaginationWindow;

/// A stored document. Always a JSON object carrying a string `id` field.
pub type Document = Value;

/// Trait for document backends (PostgreSQL JSONB or in-memory).
///
/// Every mutating method is a single atomic call against the backend.
/// Documents are returned in creation order unless stated otherwise.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a document. The document must already carry its `id`.
    async fn insert(&self, collection: Collection, doc: Document) -> AppResult<Document>;

    /// Find a document by identifier.
    async fn find_by_id(&self, collection: Collection, id: EntityId)
    -> AppResult<Option<Document>>;

    /// Find documents matching `filter`, optionally restricted to a window.
    async fn find(
        &self,
        collection: Collection,
        filter: &Predicate,
        window: Option<PaginationWindow>,
    ) -> AppResult<Vec<Document>>;

    /// Replace the top-level fields named in `set` on one document and
    /// return the post-update document, or `None` if the id is absent.
    async fn update_by_id(
        &self,
        collection: Collection,
        id: EntityId,
        set: Map<String, Value>,
    ) -> AppResult<Option<Document>>;

    /// Apply `set` to the first document matching `filter`, or insert
    /// `insert` when nothing matches. Returns the resulting document.
    async fn upsert(
        &self,
        collection: Collection,
        filter: &Predicate,
        set: Map<String, Value>,
        insert: Document,
    ) -> AppResult<Document>;

    /// Delete a document by identifier, returning the number removed.
    async fn delete_by_id(&self, collection: Collection, id: EntityId) -> AppResult<u64>;

    /// Count documents matching `filter`.
    async fn count(&self, collection: Collection, filter: &Predicate) -> AppResult<u64>;

    /// Check backend connectivity.
    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    /// Find the first document matching `filter`.
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Predicate,
    ) -> AppResult<Option<Document>> {
        let window = PaginationWindow { skip: 0, limit: 1 };
        Ok(self
            .find(collection, filter, Some(window))
            .await?
            .into_iter()
            .next())
    }

    /// Run an aggregation pipeline over the collection and return the raw
    /// result. A leading `$match` stage is pushed down into the backend.
    async fn aggregate(&self, collection: Collection, stages: &[Value]) -> AppResult<Vec<Value>> {
        let pipeline = Pipeline::parse(stages)?;
        let docs = self.find(collection, pipeline.pushdown(), None).await?;
        Ok(pipeline.run(docs))
    }
}

/// Read the identifier of a stored document.
pub fn document_id(doc: &Document) -> AppResult<EntityId> {
    doc.get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::persistence("Document is missing its 'id' field"))
        .and_then(|raw| {
            raw.parse()
                .map_err(|_| AppError::persistence(format!("Document id '{raw}' is not a UUID")))
        })
}

/// Merge `set` into a document's top-level fields.
pub fn apply_set(doc: &mut Document, set: &Map<String, Value>) {
    if let Some(object) = doc.as_object_mut() {
        for (key, value) in set {
            object.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_id() {
        let id = EntityId::new();
        let doc = json!({"id": id.to_string()});
        assert_eq!(document_id(&doc).unwrap(), id);
        assert!(document_id(&json!({"name": "x"})).is_err());
    }

    #[test]
    fn test_apply_set_replaces_arrays() {
        let mut doc = json!({"id": "1", "channels": ["email"], "daysBefore": 3});
        let set = json!({"channels": ["sms"], "daysBefore": 5});
        apply_set(&mut doc, set.as_object().unwrap());
        assert_eq!(doc["channels"], json!(["sms"]));
        assert_eq!(doc["daysBefore"], json!(5));
    }
}
