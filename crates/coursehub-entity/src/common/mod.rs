//! Building blocks shared by entity models.

pub mod reference;
pub mod update;

pub use reference::Reference;
pub use update::Update;

/// Serde default for `active` flags.
pub(crate) fn default_true() -> bool {
    true
}
