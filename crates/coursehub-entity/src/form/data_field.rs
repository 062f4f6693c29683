//! Data field entity model.

use chrono::{DateTime, Utc};
use coursehub_core::types::{Collection, EntityId, Payload};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use crate::traits::Entity;

/// Input control rendered for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Boolean,
    Select,
    Textarea,
}

impl FieldType {
    /// Whether the control picks from a fixed list of options.
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Select)
    }
}

/// A reusable form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataField {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Choices for `select` fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Payload for DataField {}

impl Entity for DataField {
    const COLLECTION: Collection = Collection::DataFields;
    const LABEL: &'static str = "Data field";
    type Create = CreateDataField;
    type Patch = DataFieldPatch;

    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_options"))]
pub struct CreateDataField {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 200))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DataFieldPatch {
    #[validate(length(min = 1, max = 100))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(length(max = 200))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn validate_options(field: &CreateDataField) -> Result<(), ValidationError> {
    if field.field_type.has_options() && field.options.is_empty() {
        let mut err = ValidationError::new("options_required");
        err.message = Some("select fields need at least one option".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_field_type_fails_to_parse() {
        let parsed: Result<CreateDataField, _> =
            serde_json::from_value(json!({"name": "age", "fieldType": "slider"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_select_requires_options() {
        let field: CreateDataField =
            serde_json::from_value(json!({"name": "level", "fieldType": "select"})).unwrap();
        assert!(field.validate().is_err());

        let field: CreateDataField = serde_json::from_value(
            json!({"name": "level", "fieldType": "select", "options": ["intro", "advanced"]}),
        )
        .unwrap();
        assert!(field.validate().is_ok());
    }
}
