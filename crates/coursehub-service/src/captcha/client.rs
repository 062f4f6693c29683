//! HTTP client for the reCAPTCHA `siteverify` endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use coursehub_core::config::RecaptchaConfig;
use coursehub_core::error::{AppError, ErrorKind, ExternalFailure};
use coursehub_core::result::AppResult;
use coursehub_core::types::{Payload, ResponseEnvelope};

/// Provider verdict for one token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptchaOutcome {
    pub success: bool,
    #[serde(default, rename = "challenge_ts", skip_serializing_if = "Option::is_none")]
    pub challenge_ts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, rename = "error-codes", skip_serializing_if = "Vec::is_empty")]
    pub error_codes: Vec<String>,
    /// Score for v3 keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Payload for CaptchaOutcome {}

/// Verifies captcha tokens against the configured provider.
#[derive(Debug, Clone)]
pub struct CaptchaVerifier {
    client: reqwest::Client,
    verify_url: String,
    secret: String,
}

impl CaptchaVerifier {
    /// Build a verifier with the configured timeout.
    pub fn new(config: &RecaptchaConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("coursehub/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build captcha HTTP client",
                    e,
                )
            })?;
        Ok(Self {
            client,
            verify_url: config.verify_url.clone(),
            secret: config.secret.clone(),
        })
    }

    /// Verify `token`. The envelope's `success` mirrors the provider.
    pub async fn verify(&self, token: &str) -> AppResult<ResponseEnvelope<CaptchaOutcome>> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::validation("Captcha token is required"));
        }

        debug!(url = %self.verify_url, "Verifying captcha token");
        let response = self
            .client
            .post(&self.verify_url)
            .form(&[("secret", self.secret.as_str()), ("response", token)])
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Captcha provider returned an error status");
            return Err(AppError::external(
                ExternalFailure::Response {
                    status: status.as_u16(),
                },
                format!("Captcha provider responded with status {}", status.as_u16()),
            ));
        }

        let outcome: CaptchaOutcome = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                "Failed to decode captcha provider response",
                e,
            )
        })?;

        let message = if outcome.success {
            "Captcha verified successfully"
        } else {
            "Captcha verification failed"
        };
        Ok(ResponseEnvelope::wrap(
            outcome.success,
            Some(message.to_string()),
            outcome,
        ))
    }
}

fn classify(e: reqwest::Error) -> AppError {
    if let Some(status) = e.status() {
        return AppError::with_source(
            ErrorKind::ExternalService(ExternalFailure::Response {
                status: status.as_u16(),
            }),
            format!("Captcha provider responded with status {}", status.as_u16()),
            e,
        );
    }
    if e.is_builder() {
        return AppError::with_source(
            ErrorKind::ExternalService(ExternalFailure::Request),
            "Failed to build captcha verification request",
            e,
        );
    }
    warn!(error = %e, timeout = e.is_timeout(), "Captcha provider did not respond");
    AppError::with_source(
        ErrorKind::ExternalService(ExternalFailure::NoResponse),
        "Captcha provider did not respond",
        e,
    )
}
