use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use fixbase_core::FixbaseError;

#[expect(
    clippy::needless_pass_by_value,
    reason = "handlers naturally own error values from `Result` and pass them through"
)]
pub fn fixbase_error_response(err: FixbaseError, operation: &str) -> Response {
    let status = status_for_fixbase_error(&err);
    let payload = err.to_payload(operation);
    if status.is_server_error() {
        error!(operation, code = %payload.code, trace_id = %payload.trace_id, error = %err, "request failed");
    } else {
        warn!(operation, code = %payload.code, trace_id = %payload.trace_id, error = %err, "request rejected");
    }
    (status, Json(payload)).into_response()
}

/// Malformed bodies and query strings are reported as validation failures.
pub fn malformed_request_response(detail: &str, operation: &str) -> Response {
    fixbase_error_response(FixbaseError::Validation(detail.to_string()), operation)
}

pub(crate) fn status_for_fixbase_error(err: &FixbaseError) -> StatusCode {
    match err {
        FixbaseError::Validation(_) | FixbaseError::Storage(_) => StatusCode::BAD_REQUEST,
        FixbaseError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        FixbaseError::NotFound(_) => StatusCode::NOT_FOUND,
        FixbaseError::Config(_)
        | FixbaseError::Io(_)
        | FixbaseError::Json(_)
        | FixbaseError::Sqlite(_)
        | FixbaseError::Http(_)
        | FixbaseError::Toml(_)
        | FixbaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
