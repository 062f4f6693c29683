//! Document store backend configuration.

use serde::{Deserialize, Serialize};

/// Which document store backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    /// PostgreSQL JSONB documents.
    #[default]
    Postgres,
    /// Process-local store; contents are lost on restart.
    Memory,
}

/// Storage section of the application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend selection: `"postgres"` or `"memory"`.
    #[serde(default)]
    pub provider: StorageProvider,
    /// Whether to run migrations on startup (PostgreSQL only).
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::default(),
            run_migrations: true,
        }
    }
}
