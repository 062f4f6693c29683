//! Organizational unit entity model.

use chrono::{DateTime, Utc};
use coursehub_core::types::{Collection, EntityId, Payload};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::common::default_true;
use crate::traits::Entity;

/// A department, faculty, or other scope that owns courses and templates.
///
/// `ou_id` is the numeric scope code other records refer to through their
/// `ou` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationalUnit {
    /// Unique identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Numeric scope code.
    pub ou_id: i64,
    /// Scope code of the parent unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ou: Option<i64>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the unit is in use.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Undeclared fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Payload for OrganizationalUnit {}

impl Entity for OrganizationalUnit {
    const COLLECTION: Collection = Collection::OrganizationalUnits;
    const LABEL: &'static str = "Organizational unit";
    type Create = CreateOrganizationalUnit;
    type Patch = OrganizationalUnitPatch;

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Data required to create an organizational unit.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationalUnit {
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Numeric scope code.
    #[validate(range(min = 0))]
    pub ou_id: i64,
    /// Scope code of the parent unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ou: Option<i64>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the unit is in use.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Undeclared fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields that may be changed on an organizational unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationalUnitPatch {
    #[validate(length(min = 1, max = 200))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ou: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
