//! # coursehub-entity
//!
//! Domain entity models for CourseHub. Every entity has three shapes: the
//! stored document (`Course`), the create input (`CreateCourse`), and an
//! all-optional patch (`CoursePatch`) wrapped in [`Update`] for updates.
//! Stored shapes keep undeclared fields in a flattened `extra` map so
//! documents round-trip without loss.

pub mod access;
pub mod audit;
pub mod common;
pub mod course;
pub mod dashboard;
pub mod form;
pub mod organization;
pub mod reminder;
pub mod search;
pub mod settings;
pub mod traits;

pub use common::{Reference, Update};
pub use traits::Entity;
