//! HTTP route handlers for the plugin service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Slack
//! POST /slack/events           - Events API webhook (always 200)
//!
//! # Host
//! POST /hooks/{event}          - Lifecycle hook (ticket.created, ticket.assigned,
//!                                reply.created, ticket.resolved)
//! GET  /notification-channel   - Slack notification channel descriptor
//! ```

pub mod hooks;
pub mod slack;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create all plugin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(slack::router())
        .merge(hooks::router())
}

/// Build the application with tracing and request IDs.
///
/// Sentry layers are added by the binary, outside of this.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
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
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
