//! Generic repository contract every entity repository implements.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::ack::DeleteAck;
use crate::types::id::EntityId;
use crate::types::pagination::PageRequest;
use crate::types::response::Payload;

/// Generic CRUD repository trait.
///
/// Entity-specific queries (aggregation, upsert, counting) live on the
/// concrete repository structs.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// The entity returned by reads and writes.
    type Entity: Payload + Send + Sync + 'static;
    /// Validated creation input.
    type Create: Send + Sync + 'static;
    /// Validated partial update carrying the target identifier.
    type Update: Send + Sync + 'static;

    /// Persist a new entity and return it with its identifier assigned.
    async fn create(&self, input: Self::Create) -> AppResult<Self::Entity>;

    /// Apply a partial update and return the post-update entity.
    ///
    /// Fails with `NotFound` when no entity has the identifier.
    async fn update(&self, input: Self::Update) -> AppResult<Self::Entity>;

    /// Delete an entity. Deleting an absent identifier acknowledges zero.
    async fn delete(&self, id: EntityId) -> AppResult<DeleteAck>;

    /// List one page of entities in creation order.
    async fn get_all(&self, page: PageRequest) -> AppResult<Vec<Self::Entity>>;

    /// Find an entity by identifier.
    async fn get_one(&self, id: EntityId) -> AppResult<Option<Self::Entity>>;
}
