//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health             - Liveness check
//! GET    /health/ready       - Readiness check (store reachable)
//!
//! # Lists (requires API token)
//! POST   /lists              - Create a list
//! POST   /lists/card         - Append a card to a list
//! GET    /lists              - Query lists
//! PUT    /lists/{id}         - Edit a list
//! DELETE /lists/{id}         - Delete a list owned by `userId`
//!
//! # Projects (requires API token)
//! POST   /projects           - Create a project and seed its lists
//! GET    /projects           - Query a user's projects
//! PUT    /projects/{id}      - Edit a project
//! DELETE /projects/{id}      - Delete a project owned by `userId`
//! ```

pub mod health;
pub mod lists;
pub mod projects;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Create the list routes router.
pub fn list_routes() -> Router<AppState> {
    Router::new()
        .route("/lists", post(lists::create).get(lists::index))
        .route("/lists/card", post(lists::create_card))
        .route("/lists/{id}", put(lists::update).delete(lists::destroy))
}

/// Create the project routes router.
pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", post(projects::create).get(projects::index))
        .route(
            "/projects/{id}",
            put(projects::update).delete(projects::destroy),
        )
}

/// Build the full application router, including health checks, request
/// tracing and the Sentry layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(list_routes())
        .merge(project_routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
