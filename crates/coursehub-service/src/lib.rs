//! # coursehub-service
//!
//! Business logic service layer for CourseHub. Services validate input,
//! call repositories, and wrap every result in a `ResponseEnvelope`.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod captcha;
pub mod context;
pub mod dashboard;
pub mod entity;
pub mod reminder;
pub mod search;
pub mod validation;

pub use captcha::{CaptchaOutcome, CaptchaVerifier};
pub use context::RequestContext;
pub use dashboard::DashboardService;
pub use entity::EntityService;
pub use reminder::ReminderService;
pub use search::{SearchQuery, SearchRecorder, SearchService};
