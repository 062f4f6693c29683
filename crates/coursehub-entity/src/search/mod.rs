//! Advanced-search requests and the log of past searches.

pub mod log;
pub mod request;

pub use log::{CreateSearchLog, SearchLog, SearchLogPatch};
pub use request::{AdvancedSearchRequest, Extras, Rule};
