//! Reminder service: upsert by alternate keys.

use std::sync::Arc;

use tracing::info;

use coursehub_core::result::AppResult;
use coursehub_core::types::ResponseEnvelope;
use coursehub_database::repositories::ReminderRepository;
use coursehub_entity::reminder::{Reminder, UpsertReminder};

use crate::validation::validate_input;

/// Reminder operations beyond plain CRUD.
#[derive(Debug, Clone)]
pub struct ReminderService {
    repo: Arc<ReminderRepository>,
}

impl ReminderService {
    /// Creates a new reminder service.
    pub fn new(repo: Arc<ReminderRepository>) -> Self {
        Self { repo }
    }

    /// Update the reminder sharing a key with `input`, or create one.
    pub async fn upsert(&self, input: UpsertReminder) -> AppResult<ResponseEnvelope<Reminder>> {
        validate_input(&input)?;
        let reminder = self.repo.upsert(input).await?;
        info!(id = %reminder.id, days_before = reminder.days_before, "Reminder upserted");
        Ok(ResponseEnvelope::ok("Reminder saved successfully", reminder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursehub_core::error::ErrorKind;
    use coursehub_core::traits::Repository;
    use coursehub_core::types::PageRequest;
    use coursehub_database::MemoryDocumentStore;
    use serde_json::json;

    fn service() -> (ReminderService, Arc<ReminderRepository>) {
        let repo = Arc::new(ReminderRepository::new(Arc::new(MemoryDocumentStore::new())));
        (ReminderService::new(Arc::clone(&repo)), repo)
    }

    fn input(value: serde_json::Value) -> UpsertReminder {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_twice_keeps_one_reminder() {
        let (service, repo) = service();
        let first = service
            .upsert(input(json!({"surveyId": "S1", "daysBefore": 3})))
            .await
            .unwrap();
        let second = service
            .upsert(input(json!({"surveyId": "S1", "daysBefore": 5})))
            .await
            .unwrap();

        assert_eq!(first.data.id, second.data.id);
        assert_eq!(second.data.days_before, 5);
        let all = repo.get_all(PageRequest::default()).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_replaces_arrays() {
        let (service, _) = service();
        service
            .upsert(input(json!({
                "trainingId": "T1",
                "daysBefore": 2,
                "channels": ["email", "sms"]
            })))
            .await
            .unwrap();
        let env = service
            .upsert(input(json!({"trainingId": "T1", "daysBefore": 2, "channels": ["push"]})))
            .await
            .unwrap();
        assert_eq!(env.data.channels, vec!["push".to_string()]);
    }

    #[tokio::test]
    async fn test_upsert_without_days_before_is_rejected() {
        let (service, _) = service();
        let err = service
            .upsert(input(json!({"surveyId": "S1"})))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
