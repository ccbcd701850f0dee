//! Per-request caller context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use drive_core::types::OwnerId;

/// Who is calling, threaded explicitly into every service method.
///
/// `identity` is `None` for anonymous requests; queries then return empty
/// results and mutations fail with an authentication error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated subject, if any.
    pub identity: Option<OwnerId>,
    /// IP address of the request origin.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Context for an authenticated caller.
    pub fn authenticated(
        owner: OwnerId,
        ip_address: impl Into<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            identity: Some(owner),
            ip_address: ip_address.into(),
            user_agent,
            request_time: Utc::now(),
        }
    }

    /// Context for a caller without credentials.
    pub fn anonymous(ip_address: impl Into<String>, user_agent: Option<String>) -> Self {
        Self {
            identity: None,
            ip_address: ip_address.into(),
            user_agent,
            request_time: Utc::now(),
        }
    }

    /// Shorthand used by tests and internal callers.
    pub fn for_owner(owner: impl Into<OwnerId>) -> Self {
        Self::authenticated(owner.into(), "127.0.0.1", None)
    }

    /// Whether an identity is present.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}
