//! Role repository: embeds permissions on read.

use std::sync::Arc;

use async_trait::async_trait;

use coursehub_core::result::AppResult;
use coursehub_core::traits::{Document, DocumentStore, Repository};
use coursehub_core::types::{Collection, DeleteAck, EntityId, PageRequest};
use coursehub_entity::Update;
use coursehub_entity::access::{CreateRole, Role, RolePatch};

use super::document::DocumentRepository;
use super::references::embed_by_id;

/// Repository for roles.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    inner: DocumentRepository<Role>,
}

impl RoleRepository {
    /// Create a new role repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: DocumentRepository::new(store),
        }
    }

    async fn expand(&self, mut docs: Vec<Document>) -> AppResult<Vec<Role>> {
        let store = self.inner.store().as_ref();
        embed_by_id(store, Collection::Permissions, &mut docs, "permissions").await?;
        docs.into_iter()
            .map(DocumentRepository::<Role>::decode)
            .collect()
    }
}

#[async_trait]
impl Repository for RoleRepository {
    type Entity = Role;
    type Create = CreateRole;
    type Update = Update<RolePatch>;

    async fn create(&self, input: CreateRole) -> AppResult<Role> {
        self.inner.create(input).await
    }

    async fn update(&self, input: Update<RolePatch>) -> AppResult<Role> {
        self.inner.update(input).await
    }

    async fn delete(&self, id: EntityId) -> AppResult<DeleteAck> {
        self.inner.delete(id).await
    }

    async fn get_all(&self, page: PageRequest) -> AppResult<Vec<Role>> {
        let docs = self.inner.find_documents(page).await?;
        self.expand(docs).await
    }

    async fn get_one(&self, id: EntityId) -> AppResult<Option<Role>> {
        let Some(doc) = self.inner.find_document(id).await? else {
            return Ok(None);
        };
        Ok(self.expand(vec![doc]).await?.pop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::PermissionRepository;
    use crate::store::MemoryDocumentStore;
    use coursehub_entity::access::CreatePermission;
    use serde_json::json;

    #[tokio::test]
    async fn test_reads_embed_permissions() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let permissions = PermissionRepository::new(Arc::clone(&store));
        let roles = RoleRepository::new(store);

        let input: CreatePermission =
            serde_json::from_value(json!({"name": "course:write"})).unwrap();
        let permission = permissions.create(input).await.unwrap();
        let input: CreateRole = serde_json::from_value(
            json!({"name": "Instructor", "permissions": [permission.id.to_string()]}),
        )
        .unwrap();
        let created = roles.create(input).await.unwrap();
        assert!(created.permissions[0].embedded().is_none());

        let fetched = roles.get_one(created.id).await.unwrap().unwrap();
        assert!(fetched.grants("course:write"));

        let listed = roles.get_all(PageRequest::default()).await.unwrap();
        assert_eq!(listed, vec![fetched]);
    }
}
