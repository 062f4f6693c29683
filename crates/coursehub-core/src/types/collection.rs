//! The logical document collections, one per entity type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A logical collection of documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Organizational units.
    OrganizationalUnits,
    /// Courses.
    Courses,
    /// Programs grouping courses.
    Programs,
    /// Scheduled course sessions.
    Sessions,
    /// Roles.
    Roles,
    /// Permissions granted through roles.
    Permissions,
    /// Analytics dashboards.
    Dashboards,
    /// Survey/assessment/training reminders.
    Reminders,
    /// Audit trail entries.
    AuditLogs,
    /// Form-builder data types.
    DataTypes,
    /// Form-builder templates.
    DataTemplates,
    /// Form-builder fields.
    DataFields,
    /// Key/value settings.
    Settings,
    /// Advanced-search invocation log.
    SearchLogs,
}

impl Collection {
    /// Every collection, in declaration order.
    pub const ALL: [Collection; 14] = [
        Self::OrganizationalUnits,
        Self::Courses,
        Self::Programs,
        Self::Sessions,
        Self::Roles,
        Self::Permissions,
        Self::Dashboards,
        Self::Reminders,
        Self::AuditLogs,
        Self::DataTypes,
        Self::DataTemplates,
        Self::DataFields,
        Self::Settings,
        Self::SearchLogs,
    ];

    /// Storage name of the collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrganizationalUnits => "organizational_units",
            Self::Courses => "courses",
            Self::Programs => "programs",
            Self::Sessions => "sessions",
            Self::Roles => "roles",
            Self::Permissions => "permissions",
            Self::Dashboards => "dashboards",
            Self::Reminders => "reminders",
            Self::AuditLogs => "audit_logs",
            Self::DataTypes => "data_types",
            Self::DataTemplates => "data_templates",
            Self::DataFields => "data_fields",
            Self::Settings => "settings",
            Self::SearchLogs => "search_logs",
        }
    }

    /// URL path segment the collection is mounted under.
    pub fn path(&self) -> String {
        self.as_str().replace('_', "-")
    }

    /// Field holding the numeric organizational-unit scope code.
    ///
    /// Organizational units carry their own code in `ouId`; every other
    /// collection refers to one through `ou`.
    pub fn scope_field(&self) -> &'static str {
        match self {
            Self::OrganizationalUnits => "ouId",
            _ => "ou",
        }
    }

    /// Singular entity name, as used in search `type` values.
    fn singular(&self) -> &'static str {
        match self {
            Self::OrganizationalUnits => "organizational_unit",
            Self::Courses => "course",
            Self::Programs => "program",
            Self::Sessions => "session",
            Self::Roles => "role",
            Self::Permissions => "permission",
            Self::Dashboards => "dashboard",
            Self::Reminders => "reminder",
            Self::AuditLogs => "audit_log",
            Self::DataTypes => "data_type",
            Self::DataTemplates => "data_template",
            Self::DataFields => "data_field",
            Self::Settings => "setting",
            Self::SearchLogs => "search_log",
        }
    }

    /// Resolve a caller-supplied type name.
    ///
    /// Accepts singular or plural forms, in snake, kebab, or camel case
    /// (`course`, `courses`, `data-template`, `dataTemplate`), plus `ou`.
    pub fn from_type_name(name: &str) -> Option<Self> {
        let normalized = normalize(name);
        if normalized == "ou" || normalized == "ous" {
            return Some(Self::OrganizationalUnits);
        }
        Self::ALL
            .into_iter()
            .find(|c| normalized == c.as_str() || normalized == c.singular())
    }
}

fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.trim().chars().enumerate() {
        match ch {
            '-' | ' ' => out.push('_'),
            c if c.is_ascii_uppercase() => {
                if i > 0 && !out.ends_with('_') {
                    out.push('_');
                }
                out.push(c.to_ascii_lowercase());
            }
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_type_name(s)
            .ok_or_else(|| AppError::validation(format!("Unknown entity type: '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_type_name_variants() {
        assert_eq!(Collection::from_type_name("course"), Some(Collection::Courses));
        assert_eq!(Collection::from_type_name("Courses"), Some(Collection::Courses));
        assert_eq!(
            Collection::from_type_name("data-template"),
            Some(Collection::DataTemplates)
        );
        assert_eq!(
            Collection::from_type_name("dataTemplate"),
            Some(Collection::DataTemplates)
        );
        assert_eq!(
            Collection::from_type_name("ou"),
            Some(Collection::OrganizationalUnits)
        );
        assert_eq!(Collection::from_type_name("spaceship"), None);
    }

    #[test]
    fn test_scope_field() {
        assert_eq!(Collection::OrganizationalUnits.scope_field(), "ouId");
        assert_eq!(Collection::Courses.scope_field(), "ou");
    }

    #[test]
    fn test_path_uses_kebab_case() {
        assert_eq!(Collection::AuditLogs.path(), "audit-logs");
        assert_eq!(Collection::Courses.path(), "courses");
    }

    #[test]
    fn test_from_str_unknown_is_validation_error() {
        let err = "widgets".parse::<Collection>().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Validation);
    }
}
