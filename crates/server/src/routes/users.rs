use axum::extract::State;
use axum::Extension;

use service::auth::Principal;

use crate::auth::ServerState;
use crate::dto::{UpdateUserRequest, UserResponse};
use crate::extract::{ApiJson, ApiPath};
use crate::response::{done, ok, ApiResult};

#[utoipa::path(
    get, path = "/api/v1/users/{id}", tag = "users",
    params(("id" = i32, Path, description = "User ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User", body = crate::openapi::UserEnvelopeDoc),
        (status = 401, description = "Unauthorized", body = crate::openapi::ErrorBodyDoc),
        (status = 403, description = "Permission denied", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get_user(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<UserResponse> {
    let user = state.users.get(&principal, id).await?;
    ok("User retrieved successfully", user.into())
}

#[utoipa::path(
    put, path = "/api/v1/users/{id}", tag = "users",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated", body = crate::openapi::UserEnvelopeDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 403, description = "Permission denied", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 409, description = "Email already registered", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update_user(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    let user = state.users.update(&principal, id, input.into()).await?;
    ok("User updated successfully", user.into())
}

#[utoipa::path(
    delete, path = "/api/v1/users/{id}", tag = "users",
    params(("id" = i32, Path, description = "User ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageEnvelopeDoc),
        (status = 403, description = "Permission denied", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete_user(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<()> {
    state.users.delete(&principal, id).await?;
    done("User deleted successfully")
}
