//! Nonce route handler

use crate::{
    api::types::{AuthenticatedConsumer, NonceResponse},
    error::Result,
    server::AppState,
};
use axum::{extract::State, Extension, Json};
use std::sync::Arc;
use tracing::debug;

/// Issue a nonce for the store API
///
/// Requires a request signed with a platform API key, with the OAuth
/// parameters in the query string or an `Authorization: OAuth` header.
#[utoipa::path(
    get,
    path = "/nonce-request/get",
    params(
        ("oauth_consumer_key" = String, Query, description = "Consumer key"),
        ("oauth_signature_method" = String, Query, description = "HMAC-SHA1 or HMAC-SHA256"),
        ("oauth_timestamp" = String, Query, description = "Unix timestamp"),
        ("oauth_nonce" = String, Query, description = "Client nonce"),
        ("oauth_signature" = String, Query, description = "Base64 request signature"),
    ),
    responses(
        (status = 200, description = "Nonce issued", body = NonceResponse),
        (status = 401, description = "Signature rejected", body = crate::error::ErrorResponse),
    ),
    tag = "nonce",
)]
pub async fn get_nonce(
    State(state): State<AppState>,
    Extension(consumer): Extension<Arc<AuthenticatedConsumer>>,
) -> Result<Json<NonceResponse>> {
    let nonce = state
        .nonces
        .create(&state.config.nonce.action, consumer.user_id)?;

    metrics::counter!("noncegate_nonces_issued_total").increment(1);
    debug!(key_id = consumer.key_id, "Issued nonce");

    Ok(Json(NonceResponse::new(nonce)))
}
