//! API middleware stack

mod auth;

pub use auth::OAuthMiddleware;

use crate::server::AppState;
use axum::Router;
use tower_http::{
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Apply the shared layers to a router
pub fn apply_middleware(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router
        // Add timeout
        .layer(TimeoutLayer::new(state.config.request_timeout()))
        // Add tracing
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
