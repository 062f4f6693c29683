//! reCAPTCHA verification configuration.

use serde::{Deserialize, Serialize};

/// Settings for the outbound reCAPTCHA verification call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecaptchaConfig {
    /// Verification endpoint URL.
    #[serde(default = "default_verify_url")]
    pub verify_url: String,
    /// Shared secret sent alongside every token.
    #[serde(default)]
    pub secret: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for RecaptchaConfig {
    fn default() -> Self {
        Self {
            verify_url: default_verify_url(),
            secret: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_verify_url() -> String {
    "https://www.google.com/recaptcha/api/siteverify".to_string()
}

fn default_timeout() -> u64 {
    10
}
