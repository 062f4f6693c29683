//! Core traits defined in `coursehub-core` and implemented by other crates.

pub mod repository;
pub mod store;

pub use repository::Repository;
pub use store::{Document, DocumentStore};
