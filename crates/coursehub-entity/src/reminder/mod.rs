//! Reminder entities.

pub mod model;

pub use model::{CreateReminder, Reminder, ReminderPatch, UpsertReminder};
