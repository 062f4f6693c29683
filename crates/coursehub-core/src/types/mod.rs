//! Core type definitions used across the CourseHub workspace.

pub mod ack;
pub mod collection;
pub mod filter;
pub mod id;
pub mod pagination;
pub mod response;

pub use ack::{CountResult, DeleteAck};
pub use collection::Collection;
pub use filter::{CompareOp, Predicate};
pub use id::EntityId;
pub use pagination::{PageRequest, PaginationWindow, compute_window};
pub use response::{Pagination, Payload, ResponseEnvelope};
