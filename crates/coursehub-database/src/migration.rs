//! Schema migrations for the `documents` table.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply every migration not yet recorded in `_sqlx_migrations`.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    let known = MIGRATOR.iter().count();
    info!(known, "Applying document store migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Persistence,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Document store schema is current");
    Ok(())
}
