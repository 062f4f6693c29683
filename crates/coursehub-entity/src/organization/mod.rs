//! Organizational unit entities.

pub mod model;

pub use model::{CreateOrganizationalUnit, OrganizationalUnit, OrganizationalUnitPatch};
