//! Role and permission entities.

pub mod permission;
pub mod role;

pub use permission::{CreatePermission, Permission, PermissionPatch};
pub use role::{CreateRole, Role, RolePatch};
