//! Role entity model.

use chrono::{DateTime, Utc};
use coursehub_core::types::{Collection, EntityId, Payload};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::permission::Permission;
use crate::common::Reference;
use crate::traits::Entity;

/// A named set of permissions.
///
/// Stored with permission ids; reads return the permissions embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<Reference<Permission>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Role {
    /// Whether an embedded permission with `name` is granted by this role.
    pub fn grants(&self, name: &str) -> bool {
        self.permissions
            .iter()
            .filter_map(Reference::embedded)
            .any(|p| p.name == name)
    }
}

impl Payload for Role {}

impl Entity for Role {
    const COLLECTION: Collection = Collection::Roles;
    const LABEL: &'static str = "Role";
    type Create = CreateRole;
    type Patch = RolePatch;

    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRole {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<EntityId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RolePatch {
    #[validate(length(min = 1, max = 100))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<EntityId>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
