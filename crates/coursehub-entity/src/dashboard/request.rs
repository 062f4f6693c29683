//! Request bodies for dashboard analytics.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Run a raw aggregation pipeline against one collection.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DynamicAggregationRequest {
    /// Collection type name (`course`, `courses`, `data-template`, ...).
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub collection_type: String,
    /// Pipeline stages.
    #[serde(default)]
    pub pipeline: Vec<Value>,
}
