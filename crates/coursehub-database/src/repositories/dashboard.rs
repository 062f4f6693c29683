//! Dashboard repository with analytics queries over any collection.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use coursehub_core::result::AppResult;
use coursehub_core::traits::{DocumentStore, Repository};
use coursehub_core::types::{Collection, DeleteAck, EntityId, PageRequest, Predicate};
use coursehub_entity::Update;
use coursehub_entity::dashboard::{CreateDashboard, Dashboard, DashboardPatch};

use super::document::DocumentRepository;

/// Repository for dashboards.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    inner: DocumentRepository<Dashboard>,
}

impl DashboardRepository {
    /// Create a new dashboard repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: DocumentRepository::new(store),
        }
    }

    /// Run an aggregation pipeline against `collection`, returning the
    /// raw result.
    pub async fn execute_pipe(
        &self,
        collection: Collection,
        stages: &[Value],
    ) -> AppResult<Vec<Value>> {
        debug!(collection = %collection, stages = stages.len(), "Executing pipeline");
        self.inner.store().aggregate(collection, stages).await
    }

    /// Count documents in `collection` matching `filter`.
    pub async fn count_record(&self, collection: Collection, filter: &Predicate) -> AppResult<u64> {
        self.inner.store().count(collection, filter).await
    }
}

#[async_trait]
impl Repository for DashboardRepository {
    type Entity = Dashboard;
    type Create = CreateDashboard;
    type Update = Update<DashboardPatch>;

    async fn create(&self, input: CreateDashboard) -> AppResult<Dashboard> {
        self.inner.create(input).await
    }

    async fn update(&self, input: Update<DashboardPatch>) -> AppResult<Dashboard> {
        self.inner.update(input).await
    }

    async fn delete(&self, id: EntityId) -> AppResult<DeleteAck> {
        self.inner.delete(id).await
    }

    async fn get_all(&self, page: PageRequest) -> AppResult<Vec<Dashboard>> {
        self.inner.get_all(page).await
    }

    async fn get_one(&self, id: EntityId) -> AppResult<Option<Dashboard>> {
        self.inner.get_one(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use coursehub_core::error::ErrorKind;
    use serde_json::json;

    async fn seeded() -> DashboardRepository {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        for (name, ou) in [("Algebra", 1), ("Biology", 2), ("Chemistry", 1)] {
            store
                .insert(
                    Collection::Courses,
                    json!({"id": EntityId::new().to_string(), "name": name, "ou": ou}),
                )
                .await
                .unwrap();
        }
        DashboardRepository::new(store)
    }

    #[tokio::test]
    async fn test_count_record() {
        let repo = seeded().await;
        let n = repo
            .count_record(Collection::Courses, &Predicate::eq("ou", 1))
            .await
            .unwrap();
        assert_eq!(n, 2);
    }

    #[tokio::test]
    async fn test_execute_pipe_groups() {
        let repo = seeded().await;
        let out = repo
            .execute_pipe(
                Collection::Courses,
                &[
                    json!({"$group": {"_id": "$ou", "n": {"$sum": 1}}}),
                    json!({"$sort": {"n": -1}}),
                ],
            )
            .await
            .unwrap();
        assert_eq!(out[0], json!({"_id": 1, "n": 2}));
    }

    #[tokio::test]
    async fn test_execute_pipe_rejects_unknown_stage() {
        let repo = seeded().await;
        let err = repo
            .execute_pipe(Collection::Courses, &[json!({"$out": "x"})])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
