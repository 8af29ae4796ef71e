//! Webhook signature verification for identity-provider events.
//!
//! The identity provider signs each webhook delivery with HMAC-SHA256 over
//! `"{id}.{timestamp}.{body}"`, using a shared secret distributed as
//! `whsec_<base64-key>`. The signature header carries one or more
//! space-separated, version-prefixed signatures (`v1,<base64>`); a delivery
//! is accepted when any `v1` candidate matches and its timestamp lies within
//! the tolerance window.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// Secret prefix used by the identity provider.
const SECRET_PREFIX: &str = "whsec_";

/// Maximum allowed clock skew between the delivery timestamp and now.
const TOLERANCE_SECS: i64 = 300;

/// Verifier for signed webhook deliveries.
#[derive(Clone)]
pub struct WebhookVerifier {
    key: Vec<u8>,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material
        f.debug_struct("WebhookVerifier").finish_non_exhaustive()
    }
}

impl WebhookVerifier {
    /// Create a verifier from a `whsec_`-prefixed shared secret.
    pub fn new(secret: &str) -> AppResult<Self> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let key = BASE64
            .decode(encoded)
            .map_err(|e| AppError::Config(format!("Invalid webhook secret: {e}")))?;

        if key.is_empty() {
            return Err(AppError::Config("Empty webhook secret".to_string()));
        }

        Ok(Self { key })
    }

    /// Verify a webhook delivery against the current clock.
    ///
    /// `signature_header` is the raw value of the signature header; `msg_id`
    /// and `timestamp` come from their respective headers. Returns an error
    /// when the timestamp is outside the tolerance window or no signature
    /// candidate matches.
    pub fn verify(
        &self,
        msg_id: &str,
        timestamp: &str,
        payload: &[u8],
        signature_header: &str,
    ) -> AppResult<()> {
        self.verify_at(msg_id, timestamp, payload, signature_header, Utc::now())
    }

    /// Verify a webhook delivery pinned to a supplied clock.
    pub fn verify_at(
        &self,
        msg_id: &str,
        timestamp: &str,
        payload: &[u8],
        signature_header: &str,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let ts: i64 = timestamp
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid webhook timestamp".to_string()))?;

        let skew = now.timestamp() - ts;
        if skew.abs() > TOLERANCE_SECS {
            return Err(AppError::BadRequest(
                "Webhook timestamp outside tolerance".to_string(),
            ));
        }

        let signed_content = signed_content(msg_id, timestamp, payload);

        for candidate in signature_header.split_whitespace() {
            let Some((version, sig)) = candidate.split_once(',') else {
                continue;
            };
            if version != "v1" {
                continue;
            }
            let Ok(sig_bytes) = BASE64.decode(sig) else {
                continue;
            };

            let mut mac = HmacSha256::new_from_slice(&self.key)
                .map_err(|e| AppError::Internal(format!("HMAC init failed: {e}")))?;
            mac.update(&signed_content);
            // Mac::verify_slice compares in constant time
            if mac.verify_slice(&sig_bytes).is_ok() {
                return Ok(());
            }
        }

        Err(AppError::BadRequest(
            "Webhook signature mismatch".to_string(),
        ))
    }
}

/// Sign a payload the way the identity provider does.
///
/// Produces a `v1,<base64>` signature for `"{id}.{timestamp}.{body}"`.
/// The server only verifies; this is the counterpart used by tests and
/// local tooling.
pub fn sign_payload(
    secret: &str,
    msg_id: &str,
    timestamp: &str,
    payload: &[u8],
) -> AppResult<String> {
    let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
    let key = BASE64
        .decode(encoded)
        .map_err(|e| AppError::Config(format!("Invalid webhook secret: {e}")))?;

    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| AppError::Internal(format!("HMAC init failed: {e}")))?;
    mac.update(&signed_content(msg_id, timestamp, payload));

    let sig = BASE64.encode(mac.finalize().into_bytes());
    Ok(format!("v1,{sig}"))
}

fn signed_content(msg_id: &str, timestamp: &str, payload: &[u8]) -> Vec<u8> {
    let mut content = Vec::with_capacity(msg_id.len() + timestamp.len() + payload.len() + 2);
    content.extend_from_slice(msg_id.as_bytes());
    content.push(b'.');
    content.extend_from_slice(timestamp.as_bytes());
    content.push(b'.');
    content.extend_from_slice(payload);
    content
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";

    fn now_and_ts() -> (DateTime<Utc>, String) {
        let now = Utc::now();
        (now, now.timestamp().to_string())
    }

    #[test]
    fn test_valid_signature_accepted() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let (now, ts) = now_and_ts();
        let payload = br#"{"type":"user.created","data":{"id":"user_1"}}"#;

        let header = sign_payload(SECRET, "msg_1", &ts, payload).unwrap();

        verifier
            .verify_at("msg_1", &ts, payload, &header, now)
            .unwrap();
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let (now, ts) = now_and_ts();

        let header = sign_payload(SECRET, "msg_1", &ts, b"original").unwrap();
        let result = verifier.verify_at("msg_1", &ts, b"tampered", &header, now);

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_wrong_message_id_rejected() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let (now, ts) = now_and_ts();

        let header = sign_payload(SECRET, "msg_1", &ts, b"body").unwrap();
        let result = verifier.verify_at("msg_2", &ts, b"body", &header, now);

        assert!(result.is_err());
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let now = Utc::now();
        let stale = (now.timestamp() - TOLERANCE_SECS - 1).to_string();

        let header = sign_payload(SECRET, "msg_1", &stale, b"body").unwrap();
        let result = verifier.verify_at("msg_1", &stale, b"body", &header, now);

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_unknown_version_candidates_skipped() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let (now, ts) = now_and_ts();

        let valid = sign_payload(SECRET, "msg_1", &ts, b"body").unwrap();
        let header = format!("v2,Zm9vYmFy {valid}");

        verifier
            .verify_at("msg_1", &ts, b"body", &header, now)
            .unwrap();
    }

    #[test]
    fn test_malformed_header_rejected() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let (now, ts) = now_and_ts();

        let result = verifier.verify_at("msg_1", &ts, b"body", "not-a-signature", now);

        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_secret_rejected() {
        let result = WebhookVerifier::new("whsec_!!!not-base64!!!");
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
