//! Course entity model.

use chrono::{DateTime, Utc};
use coursehub_core::types::{Collection, EntityId, Payload};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use crate::common::default_true;
use crate::traits::Entity;

/// A course offered by an organizational unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique identifier.
    pub id: EntityId,
    /// Course title.
    pub name: String,
    /// Catalogue code such as `CHEM-101`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning organizational unit scope code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou: Option<i64>,
    /// Program this course belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Undeclared fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Payload for Course {}

impl Entity for Course {
    const COLLECTION: Collection = Collection::Courses;
    const LABEL: &'static str = "Course";
    type Create = CreateCourse;
    type Patch = CoursePatch;

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Data required to create a course.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_dates"))]
pub struct CreateCourse {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 50))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<EntityId>,
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields that may be changed on a course.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_patch_dates"))]
pub struct CoursePatch {
    #[validate(length(min = 1, max = 200))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(length(max = 50))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<EntityId>,
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn check_dates(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            let mut err = ValidationError::new("date_order");
            err.message = Some("endDate must not precede startDate".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

fn validate_create_dates(course: &CreateCourse) -> Result<(), ValidationError> {
    check_dates(course.start_date, course.end_date)
}

fn validate_patch_dates(patch: &CoursePatch) -> Result<(), ValidationError> {
    check_dates(patch.start_date, patch.end_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_defaults_and_extra_fields() {
        let input: CreateCourse =
            serde_json::from_value(json!({"name": "Laboratory Safety", "room": "B12"})).unwrap();
        assert!(input.active);
        assert_eq!(input.extra.get("room"), Some(&json!("B12")));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_create_rejects_bad_values() {
        let input: CreateCourse =
            serde_json::from_value(json!({"name": "", "credits": 500})).unwrap();
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("credits"));
    }

    #[test]
    fn test_end_date_before_start_is_rejected() {
        let input: CreateCourse = serde_json::from_value(json!({
            "name": "Orientation",
            "startDate": "2026-09-01T00:00:00Z",
            "endDate": "2026-08-01T00:00:00Z"
        }))
        .unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = CoursePatch {
            credits: Some(4.0),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"credits": 4.0}));
    }
}
