//! Opaque identifier shared by every persisted entity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Unique identifier of a document within its collection.
///
/// Serialized as a plain UUID string in the `id` field of every document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an identifier from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Return the inner UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }

    /// Parse an identifier supplied by a caller, mapping failures to a
    /// validation error.
    pub fn parse(s: &str) -> Result<Self, AppError> {
        s.parse()
            .map_err(|_| AppError::validation(format!("Invalid identifier: '{s}'")))
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for EntityId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_differ() {
        assert_ne!(EntityId::new(), EntityId::new());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = EntityId::new();
        let json = serde_json::to_value(id).expect("serialize");
        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = EntityId::parse("not-a-uuid").unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Validation);
    }
}
