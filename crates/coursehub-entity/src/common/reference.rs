//! Links between documents that are expanded on read.

use coursehub_core::types::EntityId;
use serde::{Deserialize, Serialize};

use crate::traits::Entity;

/// A link to another record: stored as an id, returned embedded once the
/// repository has resolved it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<T> {
    /// Unresolved identifier.
    Id(EntityId),
    /// Resolved record.
    Embedded(Box<T>),
}

impl<T: Entity> Reference<T> {
    /// Identifier of the linked record, resolved or not.
    pub fn id(&self) -> EntityId {
        match self {
            Self::Id(id) => *id,
            Self::Embedded(record) => record.id(),
        }
    }

    /// The embedded record, if resolved.
    pub fn embedded(&self) -> Option<&T> {
        match self {
            Self::Id(_) => None,
            Self::Embedded(record) => Some(record),
        }
    }
}

impl<T> From<EntityId> for Reference<T> {
    fn from(id: EntityId) -> Self {
        Self::Id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Permission;
    use serde_json::json;

    #[test]
    fn test_reference_accepts_id_or_object() {
        let id = EntityId::new();
        let bare: Reference<Permission> = serde_json::from_value(json!(id.to_string())).unwrap();
        assert_eq!(bare, Reference::Id(id));

        let embedded: Reference<Permission> =
            serde_json::from_value(json!({"id": id.to_string(), "name": "course:read"})).unwrap();
        assert_eq!(embedded.id(), id);
        assert_eq!(embedded.embedded().map(|p| p.name.as_str()), Some("course:read"));
    }
}
