//! Story endpoints.

use axum::{Json, Router, extract::State, routing::post};
use mingle_common::AppResult;
use mingle_core::{CreateStoryInput, StoryWithOwner};
use serde::Serialize;

use crate::{extractors::AuthIdentity, middleware::AppState, response::ApiResponse};

use super::users::UserSummaryResponse;

/// Story response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryResponse {
    pub id: String,
    pub image_url: String,
    pub expires_at: String,
    pub owner: Option<UserSummaryResponse>,
}

impl From<StoryWithOwner> for StoryResponse {
    fn from(s: StoryWithOwner) -> Self {
        Self {
            id: s.story.id,
            image_url: s.story.image_url,
            expires_at: s.story.expires_at.to_rfc3339(),
            owner: Some(s.owner.into()),
        }
    }
}

/// Create (or replace) the actor's story.
async fn create(
    AuthIdentity(external_id): AuthIdentity,
    State(state): State<AppState>,
    Json(input): Json<CreateStoryInput>,
) -> AppResult<ApiResponse<StoryResponse>> {
    let story = state.story_service.create(&external_id, input).await?;
    Ok(ApiResponse::ok(StoryResponse {
        id: story.id,
        image_url: story.image_url,
        expires_at: story.expires_at.to_rfc3339(),
        owner: None,
    }))
}

/// List unexpired stories visible to the actor.
async fn list(
    AuthIdentity(external_id): AuthIdentity,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<StoryResponse>>> {
    let stories = state.story_service.active(&external_id).await?;
    Ok(ApiResponse::ok(
        stories.into_iter().map(Into::into).collect(),
    ))
}

/// Create the stories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/list", post(list))
}
