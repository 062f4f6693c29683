//! Update input: an identifier composed with an all-optional patch.

use coursehub_core::types::EntityId;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// Update request for one record.
///
/// The patch carries only the fields to overwrite; the id selects the
/// record and is never written into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update<P> {
    /// Record to update.
    pub id: EntityId,
    /// Fields to set.
    #[serde(flatten)]
    pub patch: P,
}

impl<P> Update<P> {
    /// Compose an update.
    pub fn new(id: EntityId, patch: P) -> Self {
        Self { id, patch }
    }
}

impl<P: Validate> Validate for Update<P> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.patch.validate()
    }
}
