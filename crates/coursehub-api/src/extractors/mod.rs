//! Custom Axum extractors.

pub mod json;
pub mod pagination;
pub mod path;
pub mod requester;

pub use json::JsonBody;
pub use pagination::PaginationParams;
pub use path::IdPath;
pub use requester::Requester;
