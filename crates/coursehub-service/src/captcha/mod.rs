//! reCAPTCHA token verification.

pub mod client;

pub use client::{CaptchaOutcome, CaptchaVerifier};
