//! Generic CRUD handlers shared by every entity.
//!
//! Each entity's repository implements [`Resource`] to locate its service
//! in the application state; the router instantiates these handlers once
//! per entity.

use std::fmt::Debug;

use axum::Json;
use axum::extract::State;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use coursehub_core::error::AppError;
use coursehub_core::traits::Repository;
use coursehub_core::types::{DeleteAck, ResponseEnvelope};
use coursehub_database::repositories::{
    AuditLogRepository, CourseRepository, DashboardRepository, DataFieldRepository,
    DataTemplateRepository, DataTypeRepository, OrganizationalUnitRepository,
    PermissionRepository, ProgramRepository, ReminderRepository, RoleRepository,
    SearchLogRepository, SessionRepository, SettingsRepository,
};
use coursehub_entity::Entity;
use coursehub_service::EntityService;

use crate::error::ApiError;
use crate::extractors::{IdPath, JsonBody, PaginationParams};
use crate::state::AppState;

/// A repository exposed over the generic CRUD endpoints.
pub trait Resource:
    Repository<
        Entity: Entity,
        Create: Validate + DeserializeOwned,
        Update: Validate + DeserializeOwned,
    > + Debug
    + Sized
{
    /// The service for this repository's entity.
    fn service(state: &AppState) -> &EntityService<Self>;
}

impl Resource for OrganizationalUnitRepository {
    fn service(state: &AppState) -> &EntityService<Self> {
        &state.organizational_units
    }
}

impl Resource for CourseRepository {
    fn service(state: &AppState) -> &EntityService<Self> {
        &state.courses
    }
}

impl Resource for ProgramRepository {
    fn service(state: &AppState) -> &EntityService<Self> {
        &state.programs
    }
}

impl Resource for SessionRepository {
    fn service(state: &AppState) -> &EntityService<Self> {
        &state.sessions
    }
}

impl Resource for RoleRepository {
    fn service(state: &AppState) -> &EntityService<Self> {
        &state.roles
    }
}

impl Resource for PermissionRepository {
    fn service(state: &AppState) -> &EntityService<Self> {
        &state.permissions
    }
}

impl Resource for DashboardRepository {
    fn service(state: &AppState) -> &EntityService<Self> {
        &state.dashboards
    }
}

impl Resource for ReminderRepository {
    fn service(state: &AppState) -> &EntityService<Self> {
        &state.reminders
    }
}

impl Resource for AuditLogRepository {
    fn service(state: &AppState) -> &EntityService<Self> {
        &state.audit_logs
    }
}

impl Resource for DataTypeRepository {
    fn service(state: &AppState) -> &EntityService<Self> {
        &state.data_types
    }
}

impl Resource for DataTemplateRepository {
    fn service(state: &AppState) -> &EntityService<Self> {
        &state.data_templates
    }
}

impl Resource for DataFieldRepository {
    fn service(state: &AppState) -> &EntityService<Self> {
        &state.data_fields
    }
}

impl Resource for SettingsRepository {
    fn service(state: &AppState) -> &EntityService<Self> {
        &state.settings
    }
}

impl Resource for SearchLogRepository {
    fn service(state: &AppState) -> &EntityService<Self> {
        &state.search_logs
    }
}

type Envelope<T> = Result<Json<ResponseEnvelope<T>>, ApiError>;

/// POST /api/<collection>
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<R::Create>,
) -> Envelope<R::Entity> {
    Ok(Json(R::service(&state).create(input).await?))
}

/// GET /api/<collection>?page=&offset=
pub async fn list<R: Resource>(
    State(state): State<AppState>,
    pagination: PaginationParams,
) -> Envelope<Vec<R::Entity>> {
    Ok(Json(
        R::service(&state)
            .get_all(pagination.into_page_request())
            .await?,
    ))
}

/// GET /api/<collection>/{id}
pub async fn get_one<R: Resource>(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Envelope<Option<R::Entity>> {
    Ok(Json(R::service(&state).get_one(id).await?))
}

/// PUT /api/<collection>/{id}
///
/// The path id wins over any `id` in the body.
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(mut body): JsonBody<Map<String, Value>>,
) -> Envelope<R::Entity> {
    body.insert("id".to_string(), Value::String(id.to_string()));
    let input: R::Update = serde_json::from_value(Value::Object(body))
        .map_err(|e| AppError::validation(format!("Invalid request body: {e}")))?;
    Ok(Json(R::service(&state).update(input).await?))
}

/// DELETE /api/<collection>/{id}
pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Envelope<DeleteAck> {
    Ok(Json(R::service(&state).delete(id).await?))
}
