//! Dashboard service: filtered counts and dynamic aggregation.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use coursehub_core::result::AppResult;
use coursehub_core::types::{CountResult, ResponseEnvelope};
use coursehub_database::repositories::DashboardRepository;
use coursehub_entity::dashboard::DynamicAggregationRequest;
use coursehub_entity::search::AdvancedSearchRequest;

use crate::context::RequestContext;
use crate::search::{SearchRecorder, build, resolve_collection};
use crate::validation::validate_input;

/// Analytics queries backing dashboard widgets.
#[derive(Debug, Clone)]
pub struct DashboardService {
    repo: Arc<DashboardRepository>,
    recorder: SearchRecorder,
}

impl DashboardService {
    /// Creates a new dashboard service.
    pub fn new(repo: Arc<DashboardRepository>, recorder: SearchRecorder) -> Self {
        Self { repo, recorder }
    }

    /// Count documents matching an advanced-search request.
    ///
    /// Logged to the search log like any other advanced search.
    pub async fn query(
        &self,
        ctx: &RequestContext,
        request: AdvancedSearchRequest,
    ) -> AppResult<ResponseEnvelope<CountResult>> {
        let outcome = self.count(&request).await;
        self.recorder
            .record(ctx, "dashboard", &request, outcome.as_ref().ok().copied());
        Ok(ResponseEnvelope::ok(
            "Dashboard query executed successfully",
            CountResult { count: outcome? },
        ))
    }

    async fn count(&self, request: &AdvancedSearchRequest) -> AppResult<u64> {
        let query = build(&request.rules, &request.extras)?;
        let collection = resolve_collection(query.collection.as_deref())?;
        let count = self.repo.count_record(collection, &query.predicate).await?;
        info!(collection = %collection, count, "Dashboard query counted");
        Ok(count)
    }

    /// Run a caller-supplied pipeline and return its raw output.
    pub async fn dynamic_aggregation(
        &self,
        request: DynamicAggregationRequest,
    ) -> AppResult<ResponseEnvelope<Vec<Value>>> {
        validate_input(&request)?;
        let collection = resolve_collection(Some(&request.collection_type))?;
        let rows = self
            .repo
            .execute_pipe(collection, &request.pipeline)
            .await?;
        info!(
            collection = %collection,
            stages = request.pipeline.len(),
            rows = rows.len(),
            "Dynamic aggregation executed"
        );
        Ok(ResponseEnvelope::ok(
            "Aggregation executed successfully",
            rows,
        ))
    }
}
