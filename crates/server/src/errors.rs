use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use service::errors::ServiceError;

/// Error response rendered as `{"success": false, "message": ..., "error": ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
    error: Option<&'a str>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, message: message.into(), detail }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid request", Some(detail.into()))
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(detail.into()))
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { success: false, message: &self.message, error: self.detail.as_deref() };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        if e.is_internal() {
            error!(code = e.code(), error = %e, "internal error");
            return JsonApiError::internal();
        }
        let code = e.code();
        let (status, message, detail) = match e {
            ServiceError::Validation(d) => (StatusCode::BAD_REQUEST, "Validation failed", d),
            ServiceError::NotFound(d) => (StatusCode::NOT_FOUND, "Resource not found", d),
            ServiceError::Forbidden(d) => (StatusCode::FORBIDDEN, "Permission denied", d),
            ServiceError::Unauthorized(d) => (StatusCode::UNAUTHORIZED, "Unauthorized", d),
            ServiceError::Conflict(d) => (StatusCode::CONFLICT, "Conflict", d),
            ServiceError::Hash(d) | ServiceError::Token(d) | ServiceError::Db(d) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", d)
            }
        };
        warn!(code, status = status.as_u16(), %detail, "request rejected");
        JsonApiError::new(status, message, Some(detail))
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self {
        JsonApiError::bad_request(r.body_text())
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(r: PathRejection) -> Self {
        JsonApiError::bad_request(r.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::Validation("v".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("n".into()), StatusCode::NOT_FOUND),
            (ServiceError::Forbidden("f".into()), StatusCode::FORBIDDEN),
            (ServiceError::Unauthorized("u".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::Conflict("c".into()), StatusCode::CONFLICT),
            (ServiceError::Db("d".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (e, status) in cases {
            assert_eq!(JsonApiError::from(e).status, status);
        }
    }

    #[test]
    fn internal_detail_is_hidden() {
        let e = JsonApiError::from(ServiceError::Db("password=hunter2 connection refused".into()));
        assert!(e.detail.is_none());
    }
}
