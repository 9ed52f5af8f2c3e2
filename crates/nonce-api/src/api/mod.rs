//! HTTP API of the nonce service

pub mod middleware;
pub mod routes;
pub mod types;

use crate::server::AppState;
use axum::{routing::get, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    let signed = Router::new()
        .route("/nonce-request/get", get(routes::nonce::get_nonce))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::OAuthMiddleware::handle,
        ));

    let router = Router::new()
        .merge(signed)
        .route("/health", get(routes::health::health_check));

    middleware::apply_middleware(router, &state)
}

/// Create OpenAPI documentation routes
pub fn docs_routes() -> Router<AppState> {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(routes::nonce::get_nonce, routes::health::health_check),
    components(schemas(
        types::NonceResponse,
        types::NoncePayload,
        types::HealthCheckResponse,
        crate::error::ErrorResponse,
        crate::error::ErrorDetails,
    )),
    tags(
        (name = "nonce", description = "Signed nonce issuing"),
        (name = "health", description = "Health and monitoring"),
    ),
    info(
        title = "Noncegate API",
        version = "0.1.0",
        description = "Issues store API nonces to callers signing requests with platform API keys",
        license(name = "MIT OR Apache-2.0"),
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development"),
    ),
)]
pub struct ApiDoc;
