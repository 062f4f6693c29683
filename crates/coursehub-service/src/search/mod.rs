//! Advanced search: rule translation, invocation logging and the search
//! service.

pub mod builder;
pub mod recorder;
pub mod service;

pub use builder::{Operator, SearchQuery, build, resolve_collection};
pub use recorder::SearchRecorder;
pub use service::SearchService;
