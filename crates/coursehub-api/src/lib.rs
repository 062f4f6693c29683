//! # coursehub-api
//!
//! HTTP API layer for CourseHub built on Axum.
//!
//! Provides the per-entity CRUD endpoints, advanced search, dashboard
//! analytics, reminder upsert, captcha verification, middleware (request
//! logging, CORS, error-log appending), extractors, and error mapping.

pub mod app;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{app_with_store, build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
