//! PostgreSQL pool setup.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use coursehub_core::config::DatabaseConfig;
use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;

/// Open the pool described by `config`.
///
/// The first connection is established eagerly.
pub async fn connect(config: &DatabaseConfig) -> AppResult<PgPool> {
    info!(
        url = %redact_url(&config.url),
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Opening PostgreSQL pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
        .connect(&config.url)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to connect to database: {e}"),
                e,
            )
        })?;

    info!(size = pool.size(), "PostgreSQL pool ready");
    Ok(pool)
}

/// Replace the password in `user:password@host` with `****`.
fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:****@{host}"),
        None => url.to_string(),
    }
}
