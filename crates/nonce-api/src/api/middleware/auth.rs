//! OAuth1.0a signature authentication middleware

use crate::{
    api::types::AuthenticatedConsumer,
    error::Error,
    oauth::{collect_parameters, missing_required, RejectReason, REQUIRED_PARAMETERS},
    server::AppState,
};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Authenticates requests signed with a platform API key
#[derive(Clone)]
pub struct OAuthMiddleware;

impl OAuthMiddleware {
    /// Middleware handler
    ///
    /// Every rejection produces the same response; the reason is only logged
    /// and counted.
    pub async fn handle(
        State(state): State<AppState>,
        req: Request,
        next: Next,
    ) -> Result<Response, Error> {
        let (mut parts, body) = req.into_parts();

        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let params = collect_parameters(parts.uri.query(), authorization);

        let missing = missing_required(&params);
        if !missing.is_empty() {
            if missing.len() == REQUIRED_PARAMETERS.len() {
                debug!("Request carries no OAuth parameters");
            } else {
                debug!("Missing OAuth parameters: {}", missing.join(", "));
            }
            return Err(reject(RejectReason::MissingParameters));
        }

        let signed = state.origin.signed_request(&parts, params);
        let consumer_key = signed.consumer_key().unwrap_or_default();
        let record = state.resolver.resolve(consumer_key).await?;

        if let Err(reason) = state.verifier.verify(record.as_ref(), &signed) {
            return Err(reject(reason));
        }

        // verify() only accepts when a record was found
        let Some(record) = record else {
            return Err(reject(RejectReason::UnknownConsumer));
        };

        metrics::counter!("noncegate_auth_total", "outcome" => "accepted", "reason" => "none")
            .increment(1);
        info!(
            key_id = record.key_id,
            user_id = record.user_id,
            "Signed request accepted"
        );

        parts.extensions.insert(Arc::new(AuthenticatedConsumer {
            key_id: record.key_id,
            user_id: record.user_id,
            permissions: record.permissions,
        }));

        Ok(next.run(Request::from_parts(parts, body)).await)
    }
}

fn reject(reason: RejectReason) -> Error {
    metrics::counter!("noncegate_auth_total", "outcome" => "rejected", "reason" => reason.as_str())
        .increment(1);
    debug!(%reason, "Signed request rejected");
    Error::unauthorized()
}
