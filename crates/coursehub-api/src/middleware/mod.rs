//! Axum middleware stack.

pub mod cors;
pub mod error_log;
pub mod logging;
