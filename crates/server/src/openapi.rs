use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::dto::{
    CreateRestaurantRequest, LoginRequest, LoginResponse, RegisterRequest, RestaurantResponse, UpdateRestaurantRequest,
    UpdateUserRequest, UserResponse,
};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorBodyDoc { pub success: bool, pub message: String, pub error: Option<String> }

#[derive(ToSchema)]
pub struct UserEnvelopeDoc { pub success: bool, pub message: String, pub data: UserResponse }

#[derive(ToSchema)]
pub struct LoginEnvelopeDoc { pub success: bool, pub message: String, pub data: LoginResponse }

#[derive(ToSchema)]
pub struct RestaurantEnvelopeDoc { pub success: bool, pub message: String, pub data: RestaurantResponse }

#[derive(ToSchema)]
pub struct RestaurantListEnvelopeDoc { pub success: bool, pub message: String, pub data: Vec<RestaurantResponse> }

/// Envelope whose `data` is always null.
#[derive(ToSchema)]
pub struct MessageEnvelopeDoc { pub success: bool, pub message: String, pub data: Option<String> }

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Restaurant API", description = "Users and their restaurants, behind bearer-token auth"),
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::users::get_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,
        crate::routes::restaurants::create_restaurant,
        crate::routes::restaurants::list_user_restaurants,
        crate::routes::restaurants::get_user_restaurant,
        crate::routes::restaurants::update_restaurant,
        crate::routes::restaurants::delete_restaurant,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBodyDoc,
            UserEnvelopeDoc,
            LoginEnvelopeDoc,
            RestaurantEnvelopeDoc,
            RestaurantListEnvelopeDoc,
            MessageEnvelopeDoc,
            UserResponse,
            RestaurantResponse,
            LoginResponse,
            RegisterRequest,
            LoginRequest,
            UpdateUserRequest,
            CreateRestaurantRequest,
            UpdateRestaurantRequest,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "restaurants")
    )
)]
pub struct ApiDoc;
