//! Repository implementations for all CourseHub entities.
//!
//! Entities without read-side expansion share [`DocumentRepository`];
//! the rest wrap it and add expansion or extra queries.

pub mod dashboard;
pub mod data_template;
pub mod document;
pub mod references;
pub mod reminder;
pub mod role;
pub mod search;

pub use dashboard::DashboardRepository;
pub use data_template::DataTemplateRepository;
pub use document::DocumentRepository;
pub use reminder::ReminderRepository;
pub use role::RoleRepository;
pub use search::SearchRepository;

use coursehub_entity::access::Permission;
use coursehub_entity::audit::AuditLog;
use coursehub_entity::course::{Course, Program, Session};
use coursehub_entity::form::{DataField, DataType};
use coursehub_entity::organization::OrganizationalUnit;
use coursehub_entity::search::SearchLog;
use coursehub_entity::settings::Settings;

pub type OrganizationalUnitRepository = DocumentRepository<OrganizationalUnit>;
pub type CourseRepository = DocumentRepository<Course>;
pub type ProgramRepository = DocumentRepository<Program>;
pub type SessionRepository = DocumentRepository<Session>;
pub type PermissionRepository = DocumentRepository<Permission>;
pub type AuditLogRepository = DocumentRepository<AuditLog>;
pub type DataTypeRepository = DocumentRepository<DataType>;
pub type DataFieldRepository = DocumentRepository<DataField>;
pub type SettingsRepository = DocumentRepository<Settings>;
pub type SearchLogRepository = DocumentRepository<SearchLog>;
