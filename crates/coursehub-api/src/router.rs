//! Route definitions for the CourseHub HTTP API.
//!
//! All routes are mounted under `/api`. Every entity gets the same five
//! CRUD endpoints under its collection path; cross-entity operations sit
//! alongside them.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use coursehub_core::types::Collection;
use coursehub_database::repositories::{
    AuditLogRepository, CourseRepository, DashboardRepository, DataFieldRepository,
    DataTemplateRepository, DataTypeRepository, OrganizationalUnitRepository,
    PermissionRepository, ProgramRepository, ReminderRepository, RoleRepository,
    SearchLogRepository, SessionRepository, SettingsRepository,
};
use coursehub_entity::Entity;

use crate::handlers;
use crate::handlers::crud::{self, Resource};
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    let api_routes = Router::new()
        .merge(entity_routes())
        .merge(search_routes())
        .merge(dashboard_routes())
        .merge(reminder_routes())
        .merge(captcha_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::error_log::append_errors,
        ))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CRUD endpoints for one entity under `/<collection-path>`.
pub fn resource_routes<R: Resource>() -> Router<AppState> {
    let collection: Collection = <R::Entity as Entity>::COLLECTION;
    let base = format!("/{}", collection.path());
    Router::new()
        .route(&base, post(crud::create::<R>).get(crud::list::<R>))
        .route(
            &format!("{base}/{{id}}"),
            get(crud::get_one::<R>)
                .put(crud::update::<R>)
                .delete(crud::delete::<R>),
        )
}

fn entity_routes() -> Router<AppState> {
    Router::new()
        .merge(resource_routes::<OrganizationalUnitRepository>())
        .merge(resource_routes::<CourseRepository>())
        .merge(resource_routes::<ProgramRepository>())
        .merge(resource_routes::<SessionRepository>())
        .merge(resource_routes::<RoleRepository>())
        .merge(resource_routes::<PermissionRepository>())
        .merge(resource_routes::<DashboardRepository>())
        .merge(resource_routes::<ReminderRepository>())
        .merge(resource_routes::<AuditLogRepository>())
        .merge(resource_routes::<DataTypeRepository>())
        .merge(resource_routes::<DataTemplateRepository>())
        .merge(resource_routes::<DataFieldRepository>())
        .merge(resource_routes::<SettingsRepository>())
        .merge(resource_routes::<SearchLogRepository>())
}

/// Advanced search across collections
fn search_routes() -> Router<AppState> {
    Router::new().route("/search", post(handlers::search::search))
}

/// Dashboard analytics
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboards/query", post(handlers::dashboard::query))
        .route(
            "/dashboards/dynamic-aggregation",
            post(handlers::dashboard::dynamic_aggregation),
        )
}

/// Reminder upsert by alternate keys
fn reminder_routes() -> Router<AppState> {
    Router::new().route("/reminders/upsert", post(handlers::reminder::upsert))
}

/// Captcha verification
fn captcha_routes() -> Router<AppState> {
    Router::new().route("/captcha/verify", post(handlers::captcha::verify))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
