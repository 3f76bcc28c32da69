use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// Success envelope: `{"success": true, "message": ..., "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), crate::errors::JsonApiError>;

pub fn ok<T: Serialize>(message: &str, data: T) -> ApiResult<T> {
    respond(StatusCode::OK, message, Some(data))
}

pub fn created<T: Serialize>(message: &str, data: T) -> ApiResult<T> {
    respond(StatusCode::CREATED, message, Some(data))
}

/// 200 with `data: null`.
pub fn done(message: &str) -> ApiResult<()> {
    respond(StatusCode::OK, message, None)
}

fn respond<T: Serialize>(status: StatusCode, message: &str, data: Option<T>) -> ApiResult<T> {
    Ok((status, Json(ApiResponse { success: true, message: message.to_string(), data })))
}
