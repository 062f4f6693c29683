//! Request context carrying the caller identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Requester recorded when no identity is supplied.
pub const ANONYMOUS: &str = "anonymous";

/// Context for the current request.
///
/// Extracted at the API boundary and passed into service methods that
/// record who acted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Caller identifier.
    pub requester: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for `requester`; blank names become anonymous.
    pub fn new(requester: impl Into<String>) -> Self {
        let requester = requester.into();
        let requester = if requester.trim().is_empty() {
            ANONYMOUS.to_string()
        } else {
            requester.trim().to_string()
        };
        Self {
            requester,
            request_time: Utc::now(),
        }
    }

    /// Context for an unidentified caller.
    pub fn anonymous() -> Self {
        Self::new(ANONYMOUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_requester_is_anonymous() {
        assert_eq!(RequestContext::new("  ").requester, ANONYMOUS);
        assert_eq!(RequestContext::new(" u-42 ").requester, "u-42");
    }
}
