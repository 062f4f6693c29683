//! Generic repository over one document collection.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;
use coursehub_core::traits::{Document, DocumentStore, Repository};
use coursehub_core::types::{DeleteAck, EntityId, PageRequest, Predicate};
use coursehub_entity::{Entity, Update};

/// Fields the repository owns; callers can never write them.
const RESERVED_FIELDS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// CRUD over the collection of `E`.
#[derive(Debug)]
pub struct DocumentRepository<E> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for DocumentRepository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

fn now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn to_fields<T: Serialize>(value: &T) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(mut fields) => {
            for key in RESERVED_FIELDS {
                fields.remove(key);
            }
            Ok(fields)
        }
        other => Err(AppError::internal(format!(
            "Expected an object to persist, got {other}"
        ))),
    }
}

impl<E: Entity> DocumentRepository<E> {
    /// Create a repository over `store`.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Build a new document from creation input: a fresh id plus
    /// creation and modification timestamps.
    pub fn new_document<T: Serialize>(input: &T) -> AppResult<(EntityId, Document)> {
        Self::new_document_with_id(EntityId::new(), input)
    }

    /// Like [`Self::new_document`] with a caller-chosen id.
    pub fn new_document_with_id<T: Serialize>(
        id: EntityId,
        input: &T,
    ) -> AppResult<(EntityId, Document)> {
        let fields = to_fields(input)?;
        let stamp = now();
        let mut doc = Map::with_capacity(fields.len() + 3);
        doc.insert("id".to_string(), Value::String(id.to_string()));
        doc.extend(fields);
        doc.insert("createdAt".to_string(), stamp.clone());
        doc.insert("updatedAt".to_string(), stamp);
        Ok((id, Value::Object(doc)))
    }

    /// Fields to `$set` for a patch, with the modification timestamp.
    pub fn patch_fields<T: Serialize>(patch: &T) -> AppResult<Map<String, Value>> {
        let mut fields = to_fields(patch)?;
        fields.insert("updatedAt".to_string(), now());
        Ok(fields)
    }

    /// Decode a stored document.
    pub fn decode(doc: Document) -> AppResult<E> {
        serde_json::from_value(doc).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Stored {} is malformed: {e}", E::LABEL.to_lowercase()),
                e,
            )
        })
    }

    /// One page of raw documents in creation order.
    pub async fn find_documents(&self, page: PageRequest) -> AppResult<Vec<Document>> {
        let window = page.window()?;
        self.store
            .find(E::COLLECTION, &Predicate::All, Some(window))
            .await
    }

    /// A raw document by id.
    pub async fn find_document(&self, id: EntityId) -> AppResult<Option<Document>> {
        self.store.find_by_id(E::COLLECTION, id).await
    }
}

#[async_trait]
impl<E: Entity> Repository for DocumentRepository<E> {
    type Entity = E;
    type Create = E::Create;
    type Update = Update<E::Patch>;

    async fn create(&self, input: E::Create) -> AppResult<E> {
        let (id, doc) = Self::new_document(&input)?;
        let stored = self.store.insert(E::COLLECTION, doc).await?;
        debug!(collection = %E::COLLECTION, id = %id, "Created document");
        Self::decode(stored)
    }

    async fn update(&self, input: Update<E::Patch>) -> AppResult<E> {
        let set = Self::patch_fields(&input.patch)?;
        let updated = self
            .store
            .update_by_id(E::COLLECTION, input.id, set)
            .await?
            .ok_or_else(|| AppError::not_found(format!("{} '{}' not found", E::LABEL, input.id)))?;
        debug!(collection = %E::COLLECTION, id = %input.id, "Updated document");
        Self::decode(updated)
    }

    async fn delete(&self, id: EntityId) -> AppResult<DeleteAck> {
        let removed = self.store.delete_by_id(E::COLLECTION, id).await?;
        debug!(collection = %E::COLLECTION, id = %id, removed, "Deleted document");
        Ok(DeleteAck::new(removed))
    }

    async fn get_all(&self, page: PageRequest) -> AppResult<Vec<E>> {
        self.find_documents(page)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    async fn get_one(&self, id: EntityId) -> AppResult<Option<E>> {
        self.find_document(id).await?.map(Self::decode).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use coursehub_core::error::ErrorKind;
    use coursehub_entity::course::{Course, CoursePatch, CreateCourse};
    use serde_json::json;

    fn repo() -> DocumentRepository<Course> {
        DocumentRepository::new(Arc::new(MemoryDocumentStore::new()))
    }

    fn create_input(name: &str) -> CreateCourse {
        serde_json::from_value(json!({"name": name, "credits": 3, "room": "B12"})).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get_one_round_trips() {
        let repo = repo();
        let created = repo.create(create_input("Laboratory Safety")).await.unwrap();
        assert!(created.created_at.is_some());
        let fetched = repo.get_one(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.extra.get("room"), Some(&json!("B12")));
    }

    #[tokio::test]
    async fn test_caller_cannot_choose_id() {
        let repo = repo();
        let forced = EntityId::new();
        let mut input = create_input("Orientation");
        input.extra.insert("id".into(), json!(forced.to_string()));
        let created = repo.create(input).await.unwrap();
        assert_ne!(created.id, forced);
    }

    #[tokio::test]
    async fn test_update_sets_fields_and_returns_new_state() {
        let repo = repo();
        let created = repo.create(create_input("Algebra")).await.unwrap();
        let patch = CoursePatch {
            credits: Some(5.0),
            ..Default::default()
        };
        let updated = repo.update(Update::new(created.id, patch)).await.unwrap();
        assert_eq!(updated.credits, Some(5.0));
        assert_eq!(updated.name, "Algebra");
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let err = repo()
            .update(Update::new(EntityId::new(), CoursePatch::default()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let repo = repo();
        let created = repo.create(create_input("Algebra")).await.unwrap();
        assert_eq!(repo.delete(created.id).await.unwrap().deleted_count, 1);
        assert_eq!(repo.delete(created.id).await.unwrap().deleted_count, 0);
        assert!(repo.get_one(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_all_applies_window() {
        let repo = repo();
        for i in 0..12 {
            repo.create(create_input(&format!("Course {i}"))).await.unwrap();
        }
        let second = repo.get_all(PageRequest::new(2, 10)).await.unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].name, "Course 10");

        let err = repo.get_all(PageRequest::new(0, 10)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }
}
