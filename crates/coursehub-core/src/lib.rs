//! # coursehub-core
//!
//! Core crate for CourseHub. Contains the generic query and response
//! contract shared by every entity: pagination windows, the response
//! envelope, backend-neutral filter predicates, the aggregation pipeline,
//! the document store and repository traits, configuration schemas, and
//! the unified error system.
//!
//! This crate has **no** internal dependencies on other CourseHub crates.

pub mod config;
pub mod error;
pub mod query;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
