//! Reminder entity model.

use chrono::{DateTime, Utc};
use coursehub_core::types::{Collection, EntityId, Payload};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use crate::common::default_true;
use crate::traits::Entity;

/// A notification scheduled relative to a survey, assessment, or training.
///
/// At most one reminder exists per target; upserts match on any of the
/// candidate keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_id: Option<String>,
    /// Days before the target date at which the reminder fires.
    pub days_before: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Delivery channels such as `email` or `sms`.
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Payload for Reminder {}

impl Entity for Reminder {
    const COLLECTION: Collection = Collection::Reminders;
    const LABEL: &'static str = "Reminder";
    type Create = CreateReminder;
    type Patch = ReminderPatch;

    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_id: Option<String>,
    #[validate(range(max = 365))]
    pub days_before: u32,
    #[validate(length(max = 1000))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReminderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_id: Option<String>,
    #[validate(range(max = 365))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_before: Option<u32>,
    #[validate(length(max = 1000))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Upsert input: the incoming reminder fields, optionally with an
/// existing `id`.
///
/// Only the fields present are written when an existing reminder
/// matches; `daysBefore` is required so a fresh insert is complete.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_upsert"))]
pub struct UpsertReminder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[validate(nested)]
    #[serde(flatten)]
    pub fields: ReminderPatch,
}

impl UpsertReminder {
    /// The alternate keys present on this input, as `(field, value)` pairs.
    pub fn match_keys(&self) -> Vec<(&'static str, String)> {
        let f = &self.fields;
        [
            ("id", self.id.map(|id| id.to_string())),
            ("surveyId", f.survey_id.clone()),
            ("assessmentId", f.assessment_id.clone()),
            ("trainingId", f.training_id.clone()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.filter(|v| !v.is_empty()).map(|v| (field, v)))
        .collect()
    }
}

fn validate_upsert(input: &UpsertReminder) -> Result<(), ValidationError> {
    if input.fields.days_before.is_none() {
        let mut err = ValidationError::new("required");
        err.message = Some("daysBefore is required".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_match_keys_skip_absent_and_empty() {
        let input: UpsertReminder = serde_json::from_value(json!({
            "surveyId": "S1",
            "trainingId": "",
            "daysBefore": 3
        }))
        .unwrap();
        assert_eq!(input.match_keys(), vec![("surveyId", "S1".to_string())]);
    }

    #[test]
    fn test_match_keys_include_id() {
        let id = EntityId::new();
        let input: UpsertReminder = serde_json::from_value(json!({
            "id": id.to_string(),
            "assessmentId": "A7",
            "daysBefore": 1
        }))
        .unwrap();
        let keys = input.match_keys();
        assert_eq!(keys[0], ("id", id.to_string()));
        assert_eq!(keys[1], ("assessmentId", "A7".to_string()));
    }

    #[test]
    fn test_days_before_required() {
        let input: UpsertReminder = serde_json::from_value(json!({"surveyId": "S1"})).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_days_before_bounded() {
        let input: UpsertReminder =
            serde_json::from_value(json!({"surveyId": "S1", "daysBefore": 400})).unwrap();
        assert!(input.validate().is_err());
    }
}
