//! Reminder repository with upsert by alternate keys.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use coursehub_core::result::AppResult;
use coursehub_core::traits::{DocumentStore, Repository};
use coursehub_core::types::{DeleteAck, EntityId, PageRequest, Predicate};
use coursehub_entity::reminder::{CreateReminder, Reminder, ReminderPatch, UpsertReminder};
use coursehub_entity::{Entity, Update};

use super::document::DocumentRepository;

/// Repository for reminders.
#[derive(Debug, Clone)]
pub struct ReminderRepository {
    inner: DocumentRepository<Reminder>,
}

impl ReminderRepository {
    /// Create a new reminder repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: DocumentRepository::new(store),
        }
    }

    /// Update the reminder matching any present alternate key, or insert
    /// a new one.
    ///
    /// Keys are `id`, `surveyId`, `assessmentId`, and `trainingId`; with
    /// none present the input is always inserted. Matching reminders get
    /// the incoming fields set, replacing arrays wholesale.
    pub async fn upsert(&self, input: UpsertReminder) -> AppResult<Reminder> {
        let keys = input.match_keys();
        let (id, insert) = DocumentRepository::<Reminder>::new_document_with_id(
            input.id.unwrap_or_default(),
            &input.fields,
        )?;

        if keys.is_empty() {
            debug!(id = %id, "Reminder has no match keys; inserting");
            let stored = self.inner.store().insert(Reminder::COLLECTION, insert).await?;
            return DocumentRepository::<Reminder>::decode(stored);
        }

        let filter = Predicate::or(
            keys.into_iter()
                .map(|(field, value)| Predicate::eq(field, value))
                .collect(),
        );
        let set = DocumentRepository::<Reminder>::patch_fields(&input.fields)?;
        let stored = self
            .inner
            .store()
            .upsert(Reminder::COLLECTION, &filter, set, insert)
            .await?;
        DocumentRepository::<Reminder>::decode(stored)
    }
}

#[async_trait]
impl Repository for ReminderRepository {
    type Entity = Reminder;
    type Create = CreateReminder;
    type Update = Update<ReminderPatch>;

    async fn create(&self, input: CreateReminder) -> AppResult<Reminder> {
        self.inner.create(input).await
    }

    async fn update(&self, input: Update<ReminderPatch>) -> AppResult<Reminder> {
        self.inner.update(input).await
    }

    async fn delete(&self, id: EntityId) -> AppResult<DeleteAck> {
        self.inner.delete(id).await
    }

    async fn get_all(&self, page: PageRequest) -> AppResult<Vec<Reminder>> {
        self.inner.get_all(page).await
    }

    async fn get_one(&self, id: EntityId) -> AppResult<Option<Reminder>> {
        self.inner.get_one(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use serde_json::json;

    fn repo() -> ReminderRepository {
        ReminderRepository::new(Arc::new(MemoryDocumentStore::new()))
    }

    fn upsert_input(value: serde_json::Value) -> UpsertReminder {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_by_survey_id_updates_in_place() {
        let repo = repo();
        let first = repo
            .upsert(upsert_input(json!({"surveyId": "S1", "daysBefore": 3, "channels": ["email"]})))
            .await
            .unwrap();
        let second = repo
            .upsert(upsert_input(json!({"surveyId": "S1", "daysBefore": 5, "channels": ["sms"]})))
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.days_before, 5);
        assert_eq!(second.channels, vec!["sms".to_string()]);
        let all = repo.get_all(PageRequest::default()).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_matches_on_any_key() {
        let repo = repo();
        let first = repo
            .upsert(upsert_input(json!({"trainingId": "T9", "daysBefore": 1, "message": "soon"})))
            .await
            .unwrap();
        let second = repo
            .upsert(upsert_input(json!({"surveyId": "S2", "trainingId": "T9", "daysBefore": 2})))
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.survey_id.as_deref(), Some("S2"));
        assert_eq!(second.message.as_deref(), Some("soon"));
    }

    #[tokio::test]
    async fn test_upsert_by_id() {
        let repo = repo();
        let first = repo
            .upsert(upsert_input(json!({"daysBefore": 1})))
            .await
            .unwrap();
        let second = repo
            .upsert(upsert_input(json!({"id": first.id.to_string(), "daysBefore": 9})))
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.days_before, 9);
    }

    #[tokio::test]
    async fn test_upsert_without_keys_always_inserts() {
        let repo = repo();
        repo.upsert(upsert_input(json!({"daysBefore": 1}))).await.unwrap();
        repo.upsert(upsert_input(json!({"daysBefore": 1}))).await.unwrap();
        let all = repo.get_all(PageRequest::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
