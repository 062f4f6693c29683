//! Background search-log writer.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::warn;

use coursehub_core::traits::Repository;
use coursehub_database::repositories::SearchLogRepository;
use coursehub_entity::search::{AdvancedSearchRequest, CreateSearchLog};

use crate::context::RequestContext;

/// Records advanced-search invocations in the `search_logs` collection.
///
/// Writes are spawned onto the runtime; a failed write is traced at WARN
/// and never reaches the caller.
#[derive(Debug, Clone)]
pub struct SearchRecorder {
    repo: Arc<SearchLogRepository>,
}

impl SearchRecorder {
    /// Creates a recorder writing through `repo`.
    pub fn new(repo: Arc<SearchLogRepository>) -> Self {
        Self { repo }
    }

    /// Queue one log entry. `result_count` is `None` when the invocation
    /// failed; `source` names the endpoint that ran the search.
    pub fn record(
        &self,
        ctx: &RequestContext,
        source: &str,
        request: &AdvancedSearchRequest,
        result_count: Option<u64>,
    ) {
        let mut extra = Map::new();
        extra.insert("source".to_string(), Value::from(source));
        let log = CreateSearchLog {
            requester: ctx.requester.clone(),
            collection_type: request.extras.collection_type.clone(),
            rules: request.rules.clone(),
            extras: request.extras.clone(),
            result_count,
            extra,
        };
        let repo = Arc::clone(&self.repo);
        tokio::spawn(async move {
            if let Err(e) = repo.create(log).await {
                warn!(error = %e, "Failed to record search log");
            }
        });
    }
}
