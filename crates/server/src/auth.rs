use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use sea_orm::DatabaseConnection;
use tracing::warn;

use service::auth::{AuthConfig, AuthService, Principal};
use service::repo::{SeaOrmRestaurantRepository, SeaOrmUserRepository};
use service::repository::{RestaurantRepository, UserRepository};
use service::{RestaurantService, UserService};

use crate::errors::JsonApiError;

/// Shared handler state: the services, wired to whatever repositories back them.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<dyn UserRepository>>,
    pub users: Arc<UserService<dyn UserRepository>>,
    pub restaurants: Arc<RestaurantService<dyn RestaurantRepository, dyn UserRepository>>,
}

impl ServerState {
    pub fn new(users: Arc<dyn UserRepository>, restaurants: Arc<dyn RestaurantRepository>, auth: AuthConfig) -> Self {
        Self {
            auth: Arc::new(AuthService::new(users.clone(), auth)),
            users: Arc::new(UserService::new(users.clone())),
            restaurants: Arc::new(RestaurantService::new(restaurants, users)),
        }
    }

    pub fn with_database(db: DatabaseConnection, auth: AuthConfig) -> Self {
        Self::new(
            Arc::new(SeaOrmUserRepository { db: db.clone() }),
            Arc::new(SeaOrmRestaurantRepository { db }),
            auth,
        )
    }
}

/// Require `Authorization: Bearer <token>`; on success the caller's
/// `Principal` is available as a request extension.
pub async fn require_bearer(State(state): State<ServerState>, mut req: Request, next: Next) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_owned();
    let header = match req.headers().get(AUTHORIZATION) {
        Some(h) => h,
        None => {
            warn!(%path, "missing Authorization header");
            return Err(JsonApiError::unauthorized("Authorization header is required"));
        }
    };
    let token = header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            warn!(%path, "invalid Authorization format (expect Bearer)");
            JsonApiError::unauthorized("Invalid authorization format, expected 'Bearer TOKEN'")
        })?;

    let claims = state.auth.validate_token(token).map_err(|e| {
        warn!(%path, error = %e, "token validation failed");
        JsonApiError::unauthorized("invalid or expired token")
    })?;

    req.extensions_mut().insert(Principal::from(&claims));
    Ok(next.run(req).await)
}
