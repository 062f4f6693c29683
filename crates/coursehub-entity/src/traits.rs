//! The contract shared by every persisted entity.

use coursehub_core::types::{Collection, EntityId, Payload};
use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::Validate;

/// A document-backed domain entity.
///
/// Ties the stored shape to its collection and its create/patch inputs so
/// repositories and services can be written once for all entities.
pub trait Entity:
    Payload + Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync + 'static
{
    /// Collection holding documents of this entity.
    const COLLECTION: Collection;

    /// Display name used in messages ("Course", "Data template").
    const LABEL: &'static str;

    /// Validated input for `create`.
    type Create: Serialize + DeserializeOwned + Validate + std::fmt::Debug + Send + Sync + 'static;

    /// All-optional field set for `update`.
    type Patch: Serialize + DeserializeOwned + Validate + std::fmt::Debug + Send + Sync + 'static;

    /// Identifier of this record.
    fn id(&self) -> EntityId;
}
