//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod health;
pub mod matches;
pub mod queue;
pub mod submissions;

use std::time::Duration;

use axum::{extract::DefaultBodyLimit, middleware, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    constants::{API_BASE_PATH, MAX_REQUEST_BODY_BYTES, REQUEST_TIMEOUT_SECONDS},
    middleware::{auth::auth_middleware, logging_middleware, rate_limit_middleware},
    state::AppState,
};

/// Create all API routes. Everything except health requires a bearer token.
pub fn routes(state: AppState) -> Router<AppState> {
    let authenticated = Router::new()
        .nest("/queue", queue::routes())
        .nest("/matches", matches::routes())
        .nest("/submissions", submissions::routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().merge(health::routes()).merge(authenticated)
}

/// The full application: API routes under the base path plus the middleware stack.
///
/// The axum middleware sits on the router itself so it sees plain axum bodies;
/// only body-agnostic tower-http layers go in the `ServiceBuilder`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest(API_BASE_PATH, routes(state.clone()))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECONDS)))
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
