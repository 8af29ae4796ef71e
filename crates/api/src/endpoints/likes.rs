//! Like endpoints.

use axum::{Json, Router, extract::State, routing::post};
use mingle_common::AppResult;
use mingle_core::LikeSwitch;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthIdentity, middleware::AppState, response::ApiResponse};

/// Like toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchLikeRequest {
    pub post_id: String,
}

/// Like toggle response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchLikeResponse {
    pub status: String,
}

/// Toggle the actor's like on a post.
async fn switch(
    AuthIdentity(external_id): AuthIdentity,
    State(state): State<AppState>,
    Json(req): Json<SwitchLikeRequest>,
) -> AppResult<ApiResponse<SwitchLikeResponse>> {
    let result = state
        .like_service
        .switch_like(&external_id, &req.post_id)
        .await?;

    let status = match result {
        LikeSwitch::Liked => "liked",
        LikeSwitch::Unliked => "unliked",
    };

    Ok(ApiResponse::ok(SwitchLikeResponse {
        status: status.to_string(),
    }))
}

/// Create the likes router.
pub fn router() -> Router<AppState> {
    Router::new().route("/switch", post(switch))
}
