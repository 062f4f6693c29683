//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use coursehub_core::config::AppConfig;
use coursehub_core::result::AppResult;
use coursehub_core::traits::DocumentStore;
use coursehub_database::repositories::{
    AuditLogRepository, CourseRepository, DashboardRepository, DataFieldRepository,
    DataTemplateRepository, DataTypeRepository, OrganizationalUnitRepository,
    PermissionRepository, ProgramRepository, ReminderRepository, RoleRepository,
    SearchLogRepository, SearchRepository, SessionRepository, SettingsRepository,
};
use coursehub_service::{
    CaptchaVerifier, DashboardService, EntityService, ReminderService, SearchRecorder,
    SearchService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Document store selected at startup.
    pub store: Arc<dyn DocumentStore>,

    // ── Entity CRUD ──────────────────────────────────────────
    pub organizational_units: EntityService<OrganizationalUnitRepository>,
    pub courses: EntityService<CourseRepository>,
    pub programs: EntityService<ProgramRepository>,
    pub sessions: EntityService<SessionRepository>,
    pub roles: EntityService<RoleRepository>,
    pub permissions: EntityService<PermissionRepository>,
    pub dashboards: EntityService<DashboardRepository>,
    pub reminders: EntityService<ReminderRepository>,
    pub audit_logs: EntityService<AuditLogRepository>,
    pub data_types: EntityService<DataTypeRepository>,
    pub data_templates: EntityService<DataTemplateRepository>,
    pub data_fields: EntityService<DataFieldRepository>,
    pub settings: EntityService<SettingsRepository>,
    pub search_logs: EntityService<SearchLogRepository>,

    // ── Cross-entity operations ──────────────────────────────
    pub search_service: Arc<SearchService>,
    pub dashboard_service: Arc<DashboardService>,
    pub reminder_service: Arc<ReminderService>,
    pub captcha: Arc<CaptchaVerifier>,
}

impl AppState {
    /// Wire repositories and services over `store`.
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> AppResult<Self> {
        let dashboard_repo = Arc::new(DashboardRepository::new(Arc::clone(&store)));
        let reminder_repo = Arc::new(ReminderRepository::new(Arc::clone(&store)));
        let search_log_repo = Arc::new(SearchLogRepository::new(Arc::clone(&store)));
        let search_repo = Arc::new(SearchRepository::new(Arc::clone(&store)));
        let recorder = SearchRecorder::new(Arc::clone(&search_log_repo));

        let captcha = Arc::new(CaptchaVerifier::new(&config.recaptcha)?);

        Ok(Self {
            organizational_units: EntityService::new(Arc::new(
                OrganizationalUnitRepository::new(Arc::clone(&store)),
            )),
            courses: EntityService::new(Arc::new(CourseRepository::new(Arc::clone(&store)))),
            programs: EntityService::new(Arc::new(ProgramRepository::new(Arc::clone(&store)))),
            sessions: EntityService::new(Arc::new(SessionRepository::new(Arc::clone(&store)))),
            roles: EntityService::new(Arc::new(RoleRepository::new(Arc::clone(&store)))),
            permissions: EntityService::new(Arc::new(PermissionRepository::new(Arc::clone(
                &store,
            )))),
            dashboards: EntityService::new(Arc::clone(&dashboard_repo)),
            reminders: EntityService::new(Arc::clone(&reminder_repo)),
            audit_logs: EntityService::new(Arc::new(AuditLogRepository::new(Arc::clone(&store)))),
            data_types: EntityService::new(Arc::new(DataTypeRepository::new(Arc::clone(&store)))),
            data_templates: EntityService::new(Arc::new(DataTemplateRepository::new(
                Arc::clone(&store),
            ))),
            data_fields: EntityService::new(Arc::new(DataFieldRepository::new(Arc::clone(
                &store,
            )))),
            settings: EntityService::new(Arc::new(SettingsRepository::new(Arc::clone(&store)))),
            search_logs: EntityService::new(Arc::clone(&search_log_repo)),
            search_service: Arc::new(SearchService::new(search_repo, recorder.clone())),
            dashboard_service: Arc::new(DashboardService::new(dashboard_repo, recorder)),
            reminder_service: Arc::new(ReminderService::new(reminder_repo)),
            captcha,
            config: Arc::new(config),
            store,
        })
    }
}
