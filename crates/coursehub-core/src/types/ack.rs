//! Acknowledgment payloads returned by write and count operations.

use serde::{Deserialize, Serialize};

/// Result of a delete: how many documents were removed.
///
/// Deleting an absent identifier is not an error; it acknowledges zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    /// Whether the store acknowledged the operation.
    pub acknowledged: bool,
    /// Number of documents removed (0 or 1).
    pub deleted_count: u64,
}

impl DeleteAck {
    /// Acknowledge a delete that removed `deleted_count` documents.
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Result of a count query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResult {
    /// Number of matching documents.
    pub count: u64,
}
