//! Store manager that dispatches to the configured backend.

use std::sync::Arc;

use tracing::info;

use coursehub_core::config::{AppConfig, StorageProvider};
use coursehub_core::result::AppResult;
use coursehub_core::traits::DocumentStore;

use crate::connection;
use crate::migration::run_migrations;

use super::{MemoryDocumentStore, PgDocumentStore};

/// Holds the document store selected at startup.
#[derive(Debug, Clone)]
pub struct StoreManager {
    inner: Arc<dyn DocumentStore>,
}

impl StoreManager {
    /// Build the store named by `storage.provider`.
    ///
    /// For PostgreSQL this connects the pool and, unless disabled, runs
    /// pending migrations.
    pub async fn new(config: &AppConfig) -> AppResult<Self> {
        let inner: Arc<dyn DocumentStore> = match config.storage.provider {
            StorageProvider::Postgres => {
                info!("Initializing PostgreSQL document store");
                let pool = connection::connect(&config.database).await?;
                if config.storage.run_migrations {
                    run_migrations(&pool).await?;
                }
                Arc::new(PgDocumentStore::new(pool))
            }
            StorageProvider::Memory => {
                info!("Initializing in-memory document store");
                Arc::new(MemoryDocumentStore::new())
            }
        };
        Ok(Self { inner })
    }

    /// Shared handle to the store.
    pub fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.inner)
    }
}
