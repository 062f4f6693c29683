//! Generic CRUD service shared by every entity.

pub mod service;

pub use service::EntityService;
