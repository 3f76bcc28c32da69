use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use models::{restaurant, user};
use service::auth::domain::{LoginInput, RegisterInput};
use service::{RestaurantPatch, UserPatch};

/// Public view of a user; the password hash never leaves the server.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self { id: u.id, name: u.name, email: u.email, role: u.role, created_at: u.created_at, updated_at: u.updated_at }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub address: String,
    pub phone: String,
    pub user_id: i32,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<restaurant::Model> for RestaurantResponse {
    fn from(r: restaurant::Model) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            address: r.address,
            phone: r.phone,
            user_id: r.user_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "s3cretPass")]
    pub password: String,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(r: RegisterRequest) -> Self { Self { name: r.name, email: r.email, password: r.password } }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub password: String,
}

impl From<LoginRequest> for LoginInput {
    fn from(r: LoginRequest) -> Self { Self { email: r.email, password: r.password } }
}

/// Omitted or empty fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// `admin` or `user`; admins only.
    pub role: Option<String>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(r: UpdateUserRequest) -> Self {
        Self { name: r.name, email: r.email, password: r.password, role: r.role }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRestaurantRequest {
    #[schema(example = "Trattoria Roma")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[schema(example = "12 Via Appia")]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

impl From<CreateRestaurantRequest> for restaurant::NewRestaurant {
    fn from(r: CreateRestaurantRequest) -> Self {
        Self { name: r.name, description: r.description, address: r.address, phone: r.phone }
    }
}

/// Omitted or empty fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl From<UpdateRestaurantRequest> for RestaurantPatch {
    fn from(r: UpdateRestaurantRequest) -> Self {
        Self { name: r.name, description: r.description, address: r.address, phone: r.phone }
    }
}
