pub mod auth;
pub mod restaurants;
pub mod users;

use std::any::Any;

use axum::{
    body::Body,
    http::{header, HeaderName, Method, Request},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::{Health, WELCOME};

use crate::auth::{require_bearer, ServerState};
use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;

pub async fn index() -> &'static str {
    WELCOME
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::PUT, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!(panic = %detail, "handler panicked");
    JsonApiError::internal().into_response()
}

/// Build the full application router: public routes, `/api/v1` (auth endpoints
/// open, everything else behind a bearer token) and the API docs.
pub fn build_router(state: ServerState) -> Router {
    let open_api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected_api = Router::new()
        .route("/users/:id", get(users::get_user).put(users::update_user).delete(users::delete_user))
        .route("/users/:id/restaurants", get(restaurants::list_user_restaurants))
        .route("/users/:id/restaurants/:restaurant_id", get(restaurants::get_user_restaurant))
        .route("/restaurants", post(restaurants::create_restaurant))
        .route("/restaurants/:id", put(restaurants::update_restaurant).delete(restaurants::delete_restaurant))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let trace = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            let request_id = req
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!("request", method = %req.method(), uri = %req.uri(), request_id = %request_id)
        })
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
        .on_failure(DefaultOnFailure::new().level(Level::ERROR));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .nest("/api/v1", open_api.merge(protected_api))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(trace)
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(build_cors())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
}
