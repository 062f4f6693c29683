//! Advanced search service.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use coursehub_core::result::AppResult;
use coursehub_core::types::{PageRequest, ResponseEnvelope};
use coursehub_database::repositories::SearchRepository;
use coursehub_entity::search::AdvancedSearchRequest;

use super::builder::{build, resolve_collection};
use super::recorder::SearchRecorder;
use crate::context::RequestContext;

/// Runs advanced searches and records each invocation.
#[derive(Debug, Clone)]
pub struct SearchService {
    search_repo: Arc<SearchRepository>,
    recorder: SearchRecorder,
}

impl SearchService {
    /// Creates a new search service.
    pub fn new(search_repo: Arc<SearchRepository>, recorder: SearchRecorder) -> Self {
        Self {
            search_repo,
            recorder,
        }
    }

    /// Search one collection, returning matching raw documents.
    ///
    /// Every invocation is logged, failed ones with no result count. The
    /// log entry is written in the background.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        request: AdvancedSearchRequest,
        page: PageRequest,
    ) -> AppResult<ResponseEnvelope<Vec<Value>>> {
        let outcome = self.execute(ctx, &request, page).await;
        self.recorder.record(
            ctx,
            "search",
            &request,
            outcome.as_ref().ok().map(|docs| docs.len() as u64),
        );

        Ok(ResponseEnvelope::ok(
            "Search results fetched successfully",
            outcome?,
        ))
    }

    async fn execute(
        &self,
        ctx: &RequestContext,
        request: &AdvancedSearchRequest,
        page: PageRequest,
    ) -> AppResult<Vec<Value>> {
        let window = page.window()?;
        let query = build(&request.rules, &request.extras)?;
        let collection = resolve_collection(query.collection.as_deref())?;

        let documents = self
            .search_repo
            .search(collection, &query.predicate, window)
            .await?;
        info!(
            collection = %collection,
            requester = %ctx.requester,
            rules = request.rules.len(),
            results = documents.len(),
            "Advanced search executed"
        );
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::recorder::tests::wait_for_logs;
    use coursehub_core::error::ErrorKind;
    use coursehub_core::traits::DocumentStore;
    use coursehub_core::types::{Collection, EntityId};
    use coursehub_database::MemoryDocumentStore;
    use coursehub_database::repositories::SearchLogRepository;
    use serde_json::json;

    async fn seeded() -> (SearchService, Arc<SearchLogRepository>) {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        for name in ["Laboratory Safety", "Orientation"] {
            store
                .insert(
                    Collection::Courses,
                    json!({"id": EntityId::new().to_string(), "name": name}),
                )
                .await
                .unwrap();
        }
        let logs = Arc::new(SearchLogRepository::new(Arc::clone(&store)));
        let service = SearchService::new(
            Arc::new(SearchRepository::new(store)),
            SearchRecorder::new(Arc::clone(&logs)),
        );
        (service, logs)
    }

    fn request(value: Value) -> AdvancedSearchRequest {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_search_returns_raw_documents() {
        let (service, _) = seeded().await;
        let env = service
            .search(
                &RequestContext::new("u-1"),
                request(json!({
                    "rules": [{"field": "name", "operator": "contains", "value": "lab"}],
                    "extras": {"type": "courses"}
                })),
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert!(env.success);
        assert_eq!(env.data.len(), 1);
        assert_eq!(env.data[0]["name"], "Laboratory Safety");
        assert_eq!(env.pagination.map(|p| p.total), Some(1));
    }

    #[tokio::test]
    async fn test_search_is_logged() {
        let (service, logs) = seeded().await;
        service
            .search(
                &RequestContext::new("u-7"),
                request(json!({"extras": {"type": "course"}})),
                PageRequest::default(),
            )
            .await
            .unwrap();

        let recorded = wait_for_logs(&logs, 1).await;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].requester, "u-7");
        assert_eq!(recorded[0].result_count, Some(2));
        assert_eq!(recorded[0].collection_type.as_deref(), Some("course"));
        assert_eq!(recorded[0].extra.get("source"), Some(&json!("search")));
    }

    #[tokio::test]
    async fn test_failed_search_is_logged_without_count() {
        let (service, logs) = seeded().await;
        let err = service
            .search(
                &RequestContext::new("u-1"),
                request(json!({
                    "rules": [{"field": "name", "operator": "~=", "value": "lab"}],
                    "extras": {"type": "course"}
                })),
                PageRequest::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedOperator);

        service
            .search(
                &RequestContext::new("u-1"),
                request(json!({"extras": {"type": "students"}})),
                PageRequest::default(),
            )
            .await
            .unwrap_err();

        let recorded = wait_for_logs(&logs, 2).await;
        assert_eq!(recorded.len(), 2);
        assert!(recorded.iter().all(|log| log.requester == "u-1"));
        assert!(recorded.iter().all(|log| log.result_count.is_none()));
    }

    #[tokio::test]
    async fn test_missing_type_is_validation_error() {
        let (service, _) = seeded().await;
        let err = service
            .search(
                &RequestContext::anonymous(),
                AdvancedSearchRequest::default(),
                PageRequest::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_bad_page_is_invalid_argument() {
        let (service, _) = seeded().await;
        let err = service
            .search(
                &RequestContext::anonymous(),
                request(json!({"extras": {"type": "course"}})),
                PageRequest::new(0, 10),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }
}
