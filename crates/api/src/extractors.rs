//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};

/// Authenticated external identity extractor.
///
/// Carries the identity provider's stable user reference, set by the auth
/// middleware. Domain services resolve it to an internal user themselves;
/// handlers never pass a client-supplied internal id as the acting
/// identity.
#[derive(Debug, Clone)]
pub struct AuthIdentity(pub String);

impl<S> FromRequestParts<S> for AuthIdentity
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware when a valid session token is present
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}
