//! Audit log entities.

pub mod model;

pub use model::{AuditLog, AuditLogPatch, CreateAuditLog};
