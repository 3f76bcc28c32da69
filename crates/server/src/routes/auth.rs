use axum::extract::State;
use tracing::info;

use crate::auth::ServerState;
use crate::dto::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::extract::ApiJson;
use crate::response::{created, ok, ApiResult};

#[utoipa::path(
    post, path = "/api/v1/auth/register", tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = crate::openapi::UserEnvelopeDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 409, description = "Email already registered", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn register(State(state): State<ServerState>, ApiJson(input): ApiJson<RegisterRequest>) -> ApiResult<UserResponse> {
    let user = state.auth.register(input.into()).await?;
    info!(user_id = user.id, "register ok");
    created("User registered successfully", user.into())
}

#[utoipa::path(
    post, path = "/api/v1/auth/login", tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = crate::openapi::LoginEnvelopeDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 401, description = "Invalid email or password", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn login(State(state): State<ServerState>, ApiJson(input): ApiJson<LoginRequest>) -> ApiResult<LoginResponse> {
    let session = state.auth.login(input.into()).await?;
    ok("Login successful", LoginResponse { user: session.user.into(), token: session.token })
}
