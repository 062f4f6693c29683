//! Data template repository: embeds data type, fields, and the owning
//! organizational unit on read.

use std::sync::Arc;

use async_trait::async_trait;

use coursehub_core::result::AppResult;
use coursehub_core::traits::{Document, DocumentStore, Repository};
use coursehub_core::types::{Collection, DeleteAck, EntityId, PageRequest};
use coursehub_entity::Update;
use coursehub_entity::form::{CreateDataTemplate, DataTemplate, DataTemplatePatch};

use super::document::DocumentRepository;
use super::references::{embed_by_id, embed_by_key};

/// Read-only field filled in from the organizational units collection.
const ORGANIZATIONAL_UNIT: &str = "organizationalUnit";

/// Repository for data templates.
#[derive(Debug, Clone)]
pub struct DataTemplateRepository {
    inner: DocumentRepository<DataTemplate>,
}

impl DataTemplateRepository {
    /// Create a new data template repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: DocumentRepository::new(store),
        }
    }

    async fn expand(&self, mut docs: Vec<Document>) -> AppResult<Vec<DataTemplate>> {
        let store = self.inner.store().as_ref();
        embed_by_id(store, Collection::DataTypes, &mut docs, "dataType").await?;
        embed_by_id(store, Collection::DataFields, &mut docs, "fields").await?;
        embed_by_key(
            store,
            Collection::OrganizationalUnits,
            &mut docs,
            "ou",
            "ouId",
            ORGANIZATIONAL_UNIT,
        )
        .await?;
        docs.into_iter()
            .map(DocumentRepository::<DataTemplate>::decode)
            .collect()
    }
}

#[async_trait]
impl Repository for DataTemplateRepository {
    type Entity = DataTemplate;
    type Create = CreateDataTemplate;
    type Update = Update<DataTemplatePatch>;

    async fn create(&self, mut input: CreateDataTemplate) -> AppResult<DataTemplate> {
        input.extra.remove(ORGANIZATIONAL_UNIT);
        self.inner.create(input).await
    }

    async fn update(&self, mut input: Update<DataTemplatePatch>) -> AppResult<DataTemplate> {
        input.patch.extra.remove(ORGANIZATIONAL_UNIT);
        self.inner.update(input).await
    }

    async fn delete(&self, id: EntityId) -> AppResult<DeleteAck> {
        self.inner.delete(id).await
    }

    async fn get_all(&self, page: PageRequest) -> AppResult<Vec<DataTemplate>> {
        let docs = self.inner.find_documents(page).await?;
        self.expand(docs).await
    }

    async fn get_one(&self, id: EntityId) -> AppResult<Option<DataTemplate>> {
        let Some(doc) = self.inner.find_document(id).await? else {
            return Ok(None);
        };
        Ok(self.expand(vec![doc]).await?.pop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{DataFieldRepository, DataTypeRepository, OrganizationalUnitRepository};
    use crate::store::MemoryDocumentStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_reads_embed_all_links() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let types = DataTypeRepository::new(Arc::clone(&store));
        let fields = DataFieldRepository::new(Arc::clone(&store));
        let units = OrganizationalUnitRepository::new(Arc::clone(&store));
        let templates = DataTemplateRepository::new(store);

        let data_type = types
            .create(serde_json::from_value(json!({"name": "Enrolment"})).unwrap())
            .await
            .unwrap();
        let field = fields
            .create(serde_json::from_value(json!({"name": "age", "fieldType": "number"})).unwrap())
            .await
            .unwrap();
        units
            .create(serde_json::from_value(json!({"name": "Science", "ouId": 12})).unwrap())
            .await
            .unwrap();

        let created = templates
            .create(
                serde_json::from_value(json!({
                    "name": "Student intake",
                    "dataType": data_type.id.to_string(),
                    "fields": [field.id.to_string()],
                    "ou": 12,
                    "organizationalUnit": {"forged": true}
                }))
                .unwrap(),
            )
            .await
            .unwrap();
        assert!(created.organizational_unit.is_none());

        let fetched = templates.get_one(created.id).await.unwrap().unwrap();
        let embedded_type = fetched.data_type.as_ref().and_then(|r| r.embedded());
        assert_eq!(embedded_type.map(|t| t.name.as_str()), Some("Enrolment"));
        assert_eq!(fetched.fields[0].embedded().map(|f| f.name.as_str()), Some("age"));
        assert_eq!(
            fetched.organizational_unit.as_ref().map(|u| u.name.as_str()),
            Some("Science")
        );
    }
}
