//! Dashboard analytics.

pub mod service;

pub use service::DashboardService;
