//! Acting user from the request (`X-User-ID` header). Authentication happens upstream.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "X-User-ID";

/// Extractor for the required user id. A missing or blank header is an invalid invocation.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(CurrentUser)
            .ok_or_else(|| AppError::InvalidInvocation(format!("missing {} header", USER_ID_HEADER)))
    }
}
