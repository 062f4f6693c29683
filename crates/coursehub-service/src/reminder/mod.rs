//! Reminder scheduling.

pub mod service;

pub use service::ReminderService;
