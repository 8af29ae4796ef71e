//! Follow endpoints.

use axum::{Json, Router, extract::State, routing::post};
use mingle_common::AppResult;
use mingle_core::FollowSwitch;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthIdentity, middleware::AppState, response::ApiResponse};

use super::users::UserSummaryResponse;

/// Follow toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchFollowRequest {
    pub user_id: String,
}

/// Follow toggle response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchFollowResponse {
    pub status: String,
}

/// Toggle the follow state towards a user.
async fn switch(
    AuthIdentity(external_id): AuthIdentity,
    State(state): State<AppState>,
    Json(req): Json<SwitchFollowRequest>,
) -> AppResult<ApiResponse<SwitchFollowResponse>> {
    let result = state
        .follow_service
        .switch_follow(&external_id, &req.user_id)
        .await?;

    let status = match result {
        FollowSwitch::Unfollowed => "unfollowed",
        FollowSwitch::RequestCanceled => "canceled",
        FollowSwitch::Requested => "requested",
    };

    Ok(ApiResponse::ok(SwitchFollowResponse {
        status: status.to_string(),
    }))
}

/// Follow request resolution request (the sender's external reference).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub user_id: String,
}

/// Accept a follow request.
async fn accept(
    AuthIdentity(external_id): AuthIdentity,
    State(state): State<AppState>,
    Json(req): Json<ResolveRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .follow_service
        .accept_request(&external_id, &req.user_id)
        .await?;
    Ok(ApiResponse::ok(()))
}

/// Decline a follow request.
async fn decline(
    AuthIdentity(external_id): AuthIdentity,
    State(state): State<AppState>,
    Json(req): Json<ResolveRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .follow_service
        .decline_request(&external_id, &req.user_id)
        .await?;
    Ok(ApiResponse::ok(()))
}

/// Pending follow request item.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequestItemResponse {
    pub id: String,
    pub created_at: String,
    pub sender: Option<UserSummaryResponse>,
}

/// List pending request params.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingListRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

const fn default_limit() -> u64 {
    10
}

/// List received follow requests (pending), with sender profiles.
async fn list_pending(
    AuthIdentity(external_id): AuthIdentity,
    State(state): State<AppState>,
    Json(req): Json<PendingListRequest>,
) -> AppResult<ApiResponse<Vec<FollowRequestItemResponse>>> {
    let limit = req.limit.min(100);
    let requests = state
        .follow_service
        .pending_requests(&external_id, limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(
        requests
            .into_iter()
            .map(|(request, sender)| FollowRequestItemResponse {
                id: request.id,
                created_at: request.created_at.to_rfc3339(),
                sender: sender.map(Into::into),
            })
            .collect(),
    ))
}

/// Create the follows router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/switch", post(switch))
        .route("/accept", post(accept))
        .route("/decline", post(decline))
        .route("/requests", post(list_pending))
}
