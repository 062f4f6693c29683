//! PostgreSQL JSONB document store.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;
use coursehub_core::traits::store::{Document, DocumentStore, document_id};
use coursehub_core::types::{Collection, EntityId, PaginationWindow, Predicate};

use super::sql::push_predicate;

/// Document store backed by the `documents` table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Persistence, message, e)
}

fn select_where<'a>(
    head: &str,
    collection: Collection,
    filter: &Predicate,
) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new(head);
    qb.push(" FROM documents WHERE collection = ");
    qb.push_bind(collection.as_str());
    qb.push(" AND ");
    push_predicate(&mut qb, filter);
    qb
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: Collection, doc: Document) -> AppResult<Document> {
        let id = document_id(&doc)?;
        sqlx::query_scalar::<_, Value>(
            "INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3) RETURNING body",
        )
        .bind(collection.as_str())
        .bind(id.into_uuid())
        .bind(Json(&doc))
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to insert document"))
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: EntityId,
    ) -> AppResult<Option<Document>> {
        sqlx::query_scalar::<_, Value>(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to find document by id"))
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Predicate,
        window: Option<PaginationWindow>,
    ) -> AppResult<Vec<Document>> {
        let mut qb = select_where("SELECT body", collection, filter);
        qb.push(" ORDER BY created_at, id");
        if let Some(window) = window {
            qb.push(" LIMIT ");
            qb.push_bind(i64::try_from(window.limit).unwrap_or(i64::MAX));
            qb.push(" OFFSET ");
            qb.push_bind(i64::try_from(window.skip).unwrap_or(i64::MAX));
        }
        debug!(collection = %collection, sql = qb.sql(), "Finding documents");

        qb.build_query_scalar::<Value>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to find documents"))
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: EntityId,
        set: Map<String, Value>,
    ) -> AppResult<Option<Document>> {
        sqlx::query_scalar::<_, Value>(
            "UPDATE documents SET body = body || $3, updated_at = now() \
             WHERE collection = $1 AND id = $2 RETURNING body",
        )
        .bind(collection.as_str())
        .bind(id.into_uuid())
        .bind(Json(Value::Object(set)))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update document"))
    }

    async fn upsert(
        &self,
        collection: Collection,
        filter: &Predicate,
        set: Map<String, Value>,
        insert: Document,
    ) -> AppResult<Document> {
        let new_id = document_id(&insert)?;

        let mut qb = QueryBuilder::<Postgres>::new(
            "WITH matched AS (SELECT id FROM documents WHERE collection = ",
        );
        qb.push_bind(collection.as_str());
        qb.push(" AND ");
        push_predicate(&mut qb, filter);
        qb.push(
            " ORDER BY created_at, id LIMIT 1 FOR UPDATE), \
             updated AS (UPDATE documents d SET body = d.body || ",
        );
        qb.push_bind(Json(Value::Object(set)));
        qb.push(", updated_at = now() FROM matched WHERE d.collection = ");
        qb.push_bind(collection.as_str());
        qb.push(
            " AND d.id = matched.id RETURNING d.body), \
             inserted AS (INSERT INTO documents (collection, id, body) SELECT ",
        );
        qb.push_bind(collection.as_str());
        qb.push(", ");
        qb.push_bind(new_id.into_uuid());
        qb.push(", ");
        qb.push_bind(Json(insert));
        qb.push(
            " WHERE NOT EXISTS (SELECT 1 FROM matched) RETURNING body) \
             SELECT body FROM updated UNION ALL SELECT body FROM inserted",
        );

        qb.build_query_scalar::<Value>()
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to upsert document"))
    }

    async fn delete_by_id(&self, collection: Collection, id: EntityId) -> AppResult<u64> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id.into_uuid())
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(db_err("Failed to delete document"))
    }

    async fn count(&self, collection: Collection, filter: &Predicate) -> AppResult<u64> {
        let mut qb = select_where("SELECT COUNT(*)", collection, filter);
        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count documents"))?;
        Ok(count.max(0) as u64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(db_err("Health check failed"))
    }
}
