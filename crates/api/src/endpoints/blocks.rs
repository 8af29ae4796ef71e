//! Block endpoints.

use axum::{Json, Router, extract::State, routing::post};
use mingle_common::AppResult;
use mingle_core::BlockSwitch;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthIdentity, middleware::AppState, response::ApiResponse};

/// Block toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchBlockRequest {
    pub user_id: String,
}

/// Block toggle response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchBlockResponse {
    pub status: String,
}

/// Toggle the block state towards a user.
async fn switch(
    AuthIdentity(external_id): AuthIdentity,
    State(state): State<AppState>,
    Json(req): Json<SwitchBlockRequest>,
) -> AppResult<ApiResponse<SwitchBlockResponse>> {
    let result = state
        .block_service
        .switch_block(&external_id, &req.user_id)
        .await?;

    let status = match result {
        BlockSwitch::Blocked => "blocked",
        BlockSwitch::Unblocked => "unblocked",
    };

    Ok(ApiResponse::ok(SwitchBlockResponse {
        status: status.to_string(),
    }))
}

/// Create the blocks router.
pub fn router() -> Router<AppState> {
    Router::new().route("/switch", post(switch))
}
