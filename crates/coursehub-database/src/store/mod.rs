//! Document store backends.

pub mod memory;
pub mod postgres;
pub mod provider;
pub mod sql;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use provider::StoreManager;
