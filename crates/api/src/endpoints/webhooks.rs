//! Identity-provider webhook receiver.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use mingle_core::IdentityEvent;

use crate::middleware::AppState;

const HEADER_ID: &str = "webhook-id";
const HEADER_TIMESTAMP: &str = "webhook-timestamp";
const HEADER_SIGNATURE: &str = "webhook-signature";

/// Receive a signed lifecycle event from the identity provider.
///
/// The signature is verified against the raw body before anything is
/// parsed; an unverifiable delivery is rejected with no side effects.
async fn identity(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let Some((msg_id, timestamp, signature)) = signature_headers(&headers) else {
        return (StatusCode::BAD_REQUEST, "Missing webhook headers");
    };

    if let Err(e) = state
        .webhook_verifier
        .verify(msg_id, timestamp, &body, signature)
    {
        tracing::warn!(error = %e, "Rejected webhook delivery");
        return (StatusCode::BAD_REQUEST, "Invalid webhook signature");
    }

    let event: IdentityEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed webhook payload");
            return (StatusCode::BAD_REQUEST, "Malformed webhook payload");
        }
    };

    match state.provisioning_service.apply(event).await {
        Ok(outcome) => {
            tracing::debug!(?outcome, "Processed identity event");
            (StatusCode::OK, "Webhook received")
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to process identity event");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to process event")
        }
    }
}

fn signature_headers(headers: &HeaderMap) -> Option<(&str, &str, &str)> {
    let msg_id = headers.get(HEADER_ID)?.to_str().ok()?;
    let timestamp = headers.get(HEADER_TIMESTAMP)?.to_str().ok()?;
    let signature = headers.get(HEADER_SIGNATURE)?.to_str().ok()?;
    Some((msg_id, timestamp, signature))
}

/// Create the webhooks router.
pub fn router() -> Router<AppState> {
    Router::new().route("/identity", post(identity))
}
