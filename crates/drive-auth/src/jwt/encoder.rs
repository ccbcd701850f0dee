//! Token signing.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use drive_core::config::AuthConfig;
use drive_core::error::{AppError, ErrorKind};
use drive_core::types::OwnerId;

use super::claims::Claims;

/// Signs access tokens with the shared HMAC secret.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    access_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Create an encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: Duration::minutes(config.jwt_access_ttl_minutes as i64),
        }
    }

    /// Issue a token for `owner` using the configured lifetime.
    pub fn issue(&self, owner: &OwnerId) -> Result<String, AppError> {
        self.issue_with_ttl(owner, self.access_ttl)
    }

    /// Issue a token for `owner` that expires after `ttl`.
    ///
    /// A negative `ttl` yields an already-expired token.
    pub fn issue_with_ttl(&self, owner: &OwnerId, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: owner.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to sign access token", e)
        })
    }
}
