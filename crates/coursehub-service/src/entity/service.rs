//! Entity CRUD service: validation and envelope wrapping over a repository.

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use coursehub_core::result::AppResult;
use coursehub_core::traits::Repository;
use coursehub_core::types::{DeleteAck, EntityId, PageRequest, ResponseEnvelope};
use coursehub_entity::Entity;

use crate::validation::validate_input;

/// CRUD service for the entity managed by `R`.
#[derive(Debug)]
pub struct EntityService<R> {
    repo: Arc<R>,
}

impl<R> Clone for EntityService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R> EntityService<R>
where
    R: Repository,
    R::Entity: Entity,
    R::Create: Validate,
    R::Update: Validate,
{
    /// Creates a new entity service.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// The underlying repository.
    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    fn label() -> &'static str {
        <R::Entity as Entity>::LABEL
    }

    /// Validate and persist a new record.
    pub async fn create(&self, input: R::Create) -> AppResult<ResponseEnvelope<R::Entity>> {
        validate_input(&input)?;
        let created = self.repo.create(input).await?;
        info!(
            collection = %<R::Entity as Entity>::COLLECTION,
            id = %created.id(),
            "Record created"
        );
        Ok(ResponseEnvelope::ok(
            format!("{} created successfully", Self::label()),
            created,
        ))
    }

    /// Validate and apply a partial update.
    pub async fn update(&self, input: R::Update) -> AppResult<ResponseEnvelope<R::Entity>> {
        validate_input(&input)?;
        let updated = self.repo.update(input).await?;
        info!(
            collection = %<R::Entity as Entity>::COLLECTION,
            id = %updated.id(),
            "Record updated"
        );
        Ok(ResponseEnvelope::ok(
            format!("{} updated successfully", Self::label()),
            updated,
        ))
    }

    /// Delete a record; deleting an absent id succeeds with a zero count.
    pub async fn delete(&self, id: EntityId) -> AppResult<ResponseEnvelope<DeleteAck>> {
        let ack = self.repo.delete(id).await?;
        info!(
            collection = %<R::Entity as Entity>::COLLECTION,
            id = %id,
            deleted = ack.deleted_count,
            "Record deleted"
        );
        Ok(ResponseEnvelope::ok(
            format!("{} deleted successfully", Self::label()),
            ack,
        ))
    }

    /// One page of records.
    pub async fn get_all(&self, page: PageRequest) -> AppResult<ResponseEnvelope<Vec<R::Entity>>> {
        let records = self.repo.get_all(page).await?;
        Ok(ResponseEnvelope::ok(
            format!("{} list fetched successfully", Self::label()),
            records,
        ))
    }

    /// One record by id. A missing record yields `success: false` with a
    /// null payload.
    pub async fn get_one(&self, id: EntityId) -> AppResult<ResponseEnvelope<Option<R::Entity>>> {
        let record = self.repo.get_one(id).await?;
        let (found, message) = match record {
            Some(_) => (true, format!("{} fetched successfully", Self::label())),
            None => (false, format!("{} not found", Self::label())),
        };
        Ok(ResponseEnvelope::wrap(found, Some(message), record))
    }
}
