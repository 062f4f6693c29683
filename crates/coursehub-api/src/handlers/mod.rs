//! HTTP request handlers.

pub mod captcha;
pub mod crud;
pub mod dashboard;
pub mod health;
pub mod reminder;
pub mod search;
