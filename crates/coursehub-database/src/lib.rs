//! # coursehub-database
//!
//! Document store backends (PostgreSQL JSONB and in-memory) and the
//! repository implementations for all CourseHub entities.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::connect;
pub use store::{MemoryDocumentStore, PgDocumentStore, StoreManager};
