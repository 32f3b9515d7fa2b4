use axum::http::HeaderMap;
use axum::response::Response;

use fixbase_core::FixbaseError;
use fixbase_core::models::UserId;

use crate::error::fixbase_error_response;

/// Set by the authenticating proxy in front of the API.
pub const USER_HEADER: &str = "x-fixbase-user";

pub fn caller_from_headers(headers: &HeaderMap) -> Option<UserId> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(UserId::parse)
}

/// Authenticated writes answer 401 before the request body is looked at.
pub fn require_caller(headers: &HeaderMap, operation: &str) -> Result<UserId, Response> {
    caller_from_headers(headers).ok_or_else(|| {
        fixbase_error_response(
            FixbaseError::Unauthorized(format!("sign in before {operation}")),
            operation,
        )
    })
}
