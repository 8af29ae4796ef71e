//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use mingle_common::WebhookVerifier;
use mingle_core::{
    BlockService, CommentService, FollowService, LikeService, PostService, ProvisioningService,
    StoryService, UserService,
};

use crate::auth::TokenVerifier;
use crate::extractors::AuthIdentity;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub follow_service: FollowService,
    pub block_service: BlockService,
    pub like_service: LikeService,
    pub comment_service: CommentService,
    pub post_service: PostService,
    pub story_service: StoryService,
    pub user_service: UserService,
    pub provisioning_service: ProvisioningService,
    pub token_verifier: TokenVerifier,
    pub webhook_verifier: WebhookVerifier,
}

/// Authentication middleware.
///
/// Attaches the external identity when a valid session token is present.
/// Requests without one pass through; endpoints that need an acting
/// identity reject via the [`AuthIdentity`] extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.token_verifier.verify(token) {
            Ok(external_id) => {
                req.extensions_mut().insert(AuthIdentity(external_id));
            }
            Err(e) => {
                tracing::debug!(error = %e, "Rejected session token");
            }
        }
    }

    next.run(req).await
}
