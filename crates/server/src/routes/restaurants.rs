use axum::extract::State;
use axum::Extension;

use service::auth::Principal;

use crate::auth::ServerState;
use crate::dto::{CreateRestaurantRequest, RestaurantResponse, UpdateRestaurantRequest};
use crate::extract::{ApiJson, ApiPath};
use crate::response::{created, done, ok, ApiResult};

#[utoipa::path(
    post, path = "/api/v1/restaurants", tag = "restaurants",
    request_body = CreateRestaurantRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Created", body = crate::openapi::RestaurantEnvelopeDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 401, description = "Unauthorized", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Owner no longer exists", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create_restaurant(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    ApiJson(input): ApiJson<CreateRestaurantRequest>,
) -> ApiResult<RestaurantResponse> {
    let r = state.restaurants.create(&principal, input.into()).await?;
    created("Restaurant created successfully", r.into())
}

#[utoipa::path(
    get, path = "/api/v1/users/{id}/restaurants", tag = "restaurants",
    params(("id" = i32, Path, description = "Owner user ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Restaurants of the user", body = crate::openapi::RestaurantListEnvelopeDoc),
        (status = 403, description = "Permission denied", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "User not found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list_user_restaurants(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    ApiPath(user_id): ApiPath<i32>,
) -> ApiResult<Vec<RestaurantResponse>> {
    let list = state.restaurants.list_for_user(&principal, user_id).await?;
    ok("Restaurants retrieved successfully", list.into_iter().map(Into::into).collect())
}

#[utoipa::path(
    get, path = "/api/v1/users/{id}/restaurants/{restaurant_id}", tag = "restaurants",
    params(
        ("id" = i32, Path, description = "Owner user ID"),
        ("restaurant_id" = i32, Path, description = "Restaurant ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Restaurant", body = crate::openapi::RestaurantEnvelopeDoc),
        (status = 403, description = "Permission denied", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get_user_restaurant(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    ApiPath((user_id, id)): ApiPath<(i32, i32)>,
) -> ApiResult<RestaurantResponse> {
    let r = state.restaurants.get_for_user(&principal, user_id, id).await?;
    ok("Restaurant retrieved successfully", r.into())
}

#[utoipa::path(
    put, path = "/api/v1/restaurants/{id}", tag = "restaurants",
    params(("id" = i32, Path, description = "Restaurant ID")),
    request_body = UpdateRestaurantRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated", body = crate::openapi::RestaurantEnvelopeDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 403, description = "Permission denied", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update_restaurant(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<UpdateRestaurantRequest>,
) -> ApiResult<RestaurantResponse> {
    let r = state.restaurants.update(&principal, id, input.into()).await?;
    ok("Restaurant updated successfully", r.into())
}

#[utoipa::path(
    delete, path = "/api/v1/restaurants/{id}", tag = "restaurants",
    params(("id" = i32, Path, description = "Restaurant ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageEnvelopeDoc),
        (status = 403, description = "Permission denied", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete_restaurant(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<()> {
    state.restaurants.delete(&principal, id).await?;
    done("Restaurant deleted successfully")
}
