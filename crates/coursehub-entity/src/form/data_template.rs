//! Data template entity model.

use chrono::{DateTime, Utc};
use coursehub_core::types::{Collection, EntityId, Payload};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::data_field::DataField;
use super::data_type::DataType;
use crate::common::Reference;
use crate::organization::OrganizationalUnit;
use crate::traits::Entity;

/// A form composed of fields, tied to a data type and optionally to an
/// organizational unit.
///
/// `data_type` and `fields` are stored as ids and embedded on read.
/// `organizational_unit` is never stored; reads fill it from the unit
/// whose `ouId` equals `ou`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTemplate {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub data_type: Option<Reference<DataType>>,
    #[serde(default)]
    pub fields: Vec<Reference<DataField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizational_unit: Option<OrganizationalUnit>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Payload for DataTemplate {}

impl Entity for DataTemplate {
    const COLLECTION: Collection = Collection::DataTemplates;
    const LABEL: &'static str = "Data template";
    type Create = CreateDataTemplate;
    type Patch = DataTemplatePatch;

    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDataTemplate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub data_type: EntityId,
    #[serde(default)]
    pub fields: Vec<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DataTemplatePatch {
    #[validate(length(min = 1, max = 200))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<EntityId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
