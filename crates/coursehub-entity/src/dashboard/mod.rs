//! Dashboard entities and analytics requests.

pub mod model;
pub mod request;

pub use model::{CreateDashboard, Dashboard, DashboardPatch};
pub use request::DynamicAggregationRequest;
