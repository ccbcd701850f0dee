//! `Caller` extractor: resolves the bearer token, if any, into a request context.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use drive_core::error::AppError;
use drive_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// The caller of the current request.
///
/// A request without an `Authorization` header is anonymous, which lets
/// queries answer with empty results. A header that is present but
/// malformed, or carries a token that fails verification, is rejected.
#[derive(Debug, Clone)]
pub struct Caller(pub RequestContext);

impl Caller {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for Caller {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(Caller(RequestContext::anonymous(ip_address, user_agent)));
        }

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::authentication("Invalid Authorization header format"))?;

        let claims = state.jwt_decoder.decode_access_token(bearer.token())?;

        Ok(Caller(RequestContext::authenticated(
            claims.owner_id(),
            ip_address,
            user_agent,
        )))
    }
}
