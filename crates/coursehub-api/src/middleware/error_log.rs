//! Appends failed requests to a per-day log file.
//!
//! Each error response carries an [`ErrorRecord`]; this middleware turns
//! it into one JSON line in `<logging.directory>/<YYYY-MM-DD>.log`. The
//! write runs on a spawned task and its failure is only traced.

use std::path::{Path, PathBuf};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tokio::io::AsyncWriteExt;

use crate::error::ErrorRecord;
use crate::state::AppState;

/// Records every error response to the daily error log.
pub async fn append_errors(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    if let Some(record) = response.extensions().get::<ErrorRecord>() {
        let now = Utc::now();
        let line = json!({
            "timestamp": now.to_rfc3339_opts(SecondsFormat::Millis, true),
            "method": method.as_str(),
            "path": path,
            "statusCode": record.status.as_u16(),
            "kind": record.kind.to_string(),
            "message": record.detail,
        })
        .to_string();
        let date = now.format("%Y-%m-%d").to_string();
        let file = log_file(Path::new(&state.config.logging.directory), &date);
        tokio::spawn(async move {
            if let Err(e) = append_line(&file, &line).await {
                tracing::warn!(file = %file.display(), error = %e, "Failed to append error log");
            }
        });
    }

    response
}

/// Path of the error log for `date`.
pub fn log_file(directory: &Path, date: &str) -> PathBuf {
    directory.join(format!("{date}.log"))
}

async fn append_line(file: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = file.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut handle = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .await?;
    handle.write_all(format!("{line}\n").as_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_is_named_by_date() {
        assert_eq!(
            log_file(Path::new("data/logs"), "2026-03-01"),
            PathBuf::from("data/logs/2026-03-01.log")
        );
    }

    #[tokio::test]
    async fn test_append_line_creates_directory() {
        let dir = std::env::temp_dir().join(format!("coursehub-log-{}", std::process::id()));
        let file = log_file(&dir, "2026-03-01");
        append_line(&file, "first").await.unwrap();
        append_line(&file, "second").await.unwrap();
        let contents = tokio::fs::read_to_string(&file).await.unwrap();
        assert_eq!(contents, "first\nsecond\n");
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
