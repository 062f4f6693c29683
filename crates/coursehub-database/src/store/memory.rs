//! In-memory document store using dashmap.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};
use tracing::debug;

use coursehub_core::error::AppError;
use coursehub_core::result::AppResult;
use coursehub_core::traits::store::{Document, DocumentStore, apply_set, document_id};
use coursehub_core::types::{Collection, EntityId, PaginationWindow, Predicate};

/// Process-local document store.
///
/// Each collection is a vector kept in insertion order, which doubles as
/// creation order. Every operation holds the collection's shard lock for
/// its whole duration, so each call is atomic.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: DashMap<Collection, Vec<Document>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn has_id(doc: &Document, id: &str) -> bool {
    doc.get("id").and_then(Value::as_str) == Some(id)
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: Collection, doc: Document) -> AppResult<Document> {
        let id = document_id(&doc)?.to_string();
        let mut docs = self.collections.entry(collection).or_default();
        if docs.iter().any(|d| has_id(d, &id)) {
            return Err(AppError::persistence(format!(
                "Document '{id}' already exists in {collection}"
            )));
        }
        docs.push(doc.clone());
        Ok(doc)
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: EntityId,
    ) -> AppResult<Option<Document>> {
        let id = id.to_string();
        Ok(self
            .collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| has_id(d, &id)).cloned()))
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Predicate,
        window: Option<PaginationWindow>,
    ) -> AppResult<Vec<Document>> {
        let Some(docs) = self.collections.get(&collection) else {
            return Ok(Vec::new());
        };
        let (skip, limit) = window
            .map(|w| (to_usize(w.skip), to_usize(w.limit)))
            .unwrap_or((0, usize::MAX));
        let found: Vec<Document> = docs
            .iter()
            .filter(|d| filter.matches(d))
            .skip(skip)
            .take(limit)
            .cloned()
            .collect();
        debug!(collection = %collection, count = found.len(), "Found documents");
        Ok(found)
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: EntityId,
        set: Map<String, Value>,
    ) -> AppResult<Option<Document>> {
        let id = id.to_string();
        let Some(mut docs) = self.collections.get_mut(&collection) else {
            return Ok(None);
        };
        Ok(docs.iter_mut().find(|d| has_id(d, &id)).map(|doc| {
            apply_set(doc, &set);
            doc.clone()
        }))
    }

    async fn upsert(
        &self,
        collection: Collection,
        filter: &Predicate,
        set: Map<String, Value>,
        insert: Document,
    ) -> AppResult<Document> {
        let mut docs = self.collections.entry(collection).or_default();
        if let Some(doc) = docs.iter_mut().find(|d| filter.matches(d)) {
            apply_set(doc, &set);
            return Ok(doc.clone());
        }
        document_id(&insert)?;
        docs.push(insert.clone());
        Ok(insert)
    }

    async fn delete_by_id(&self, collection: Collection, id: EntityId) -> AppResult<u64> {
        let id = id.to_string();
        let Some(mut docs) = self.collections.get_mut(&collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|d| !has_id(d, &id));
        Ok((before - docs.len()) as u64)
    }

    async fn count(&self, collection: Collection, filter: &Predicate) -> AppResult<u64> {
        Ok(self
            .collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).count() as u64)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(name: &str) -> (EntityId, Document) {
        let id = EntityId::new();
        (id, json!({"id": id.to_string(), "name": name, "credits": 3}))
    }

    #[tokio::test]
    async fn test_insert_and_find_in_order() {
        let store = MemoryDocumentStore::new();
        for name in ["Algebra", "Biology", "Chemistry"] {
            store.insert(Collection::Courses, doc(name).1).await.unwrap();
        }
        let window = PaginationWindow { skip: 1, limit: 1 };
        let page = store
            .find(Collection::Courses, &Predicate::All, Some(window))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0]["name"], "Biology");
        assert!(
            store
                .find(Collection::Programs, &Predicate::All, None)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let store = MemoryDocumentStore::new();
        let (_, d) = doc("Algebra");
        store.insert(Collection::Courses, d.clone()).await.unwrap();
        assert!(store.insert(Collection::Courses, d).await.is_err());
    }

    #[tokio::test]
    async fn test_update_returns_post_update_document() {
        let store = MemoryDocumentStore::new();
        let (id, d) = doc("Algebra");
        store.insert(Collection::Courses, d).await.unwrap();
        let mut set = Map::new();
        set.insert("credits".into(), json!(5));
        let updated = store
            .update_by_id(Collection::Courses, id, set.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["credits"], 5);
        assert!(
            store
                .update_by_id(Collection::Courses, EntityId::new(), set)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_upsert_updates_first_match_or_inserts() {
        let store = MemoryDocumentStore::new();
        let filter = Predicate::eq("surveyId", "S1");
        let mut set = Map::new();
        set.insert("surveyId".into(), json!("S1"));
        set.insert("daysBefore".into(), json!(3));
        let first_id = EntityId::new();
        let mut insert = Value::Object(set.clone());
        insert["id"] = json!(first_id.to_string());

        store
            .upsert(Collection::Reminders, &filter, set.clone(), insert.clone())
            .await
            .unwrap();
        set.insert("daysBefore".into(), json!(5));
        insert["id"] = json!(EntityId::new().to_string());
        let result = store
            .upsert(Collection::Reminders, &filter, set, insert)
            .await
            .unwrap();

        assert_eq!(result["id"], json!(first_id.to_string()));
        assert_eq!(result["daysBefore"], 5);
        assert_eq!(store.count(Collection::Reminders, &filter).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryDocumentStore::new();
        let (id, d) = doc("Algebra");
        store.insert(Collection::Courses, d).await.unwrap();
        assert_eq!(store.delete_by_id(Collection::Courses, id).await.unwrap(), 1);
        assert_eq!(store.delete_by_id(Collection::Courses, id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_aggregate_uses_default_pipeline() {
        let store = MemoryDocumentStore::new();
        for name in ["Algebra", "Biology", "Chemistry"] {
            store.insert(Collection::Courses, doc(name).1).await.unwrap();
        }
        let out = store
            .aggregate(
                Collection::Courses,
                &[
                    json!({"$match": {"name": {"$ne": "Biology"}}}),
                    json!({"$group": {"_id": null, "credits": {"$sum": "$credits"}}}),
                ],
            )
            .await
            .unwrap();
        assert_eq!(out, vec![json!({"_id": null, "credits": 6})]);
    }
}
