//! Comment endpoints.

use axum::{Json, Router, extract::State, routing::post};
use mingle_common::AppResult;
use mingle_core::{CommentWithAuthor, CreateCommentInput};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthIdentity, middleware::AppState, response::ApiResponse};

use super::users::UserSummaryResponse;

/// Comment with its author, for immediate display.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub text: String,
    pub created_at: String,
    pub author: UserSummaryResponse,
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(c: CommentWithAuthor) -> Self {
        Self {
            id: c.comment.id,
            post_id: c.comment.post_id,
            text: c.comment.text,
            created_at: c.comment.created_at.to_rfc3339(),
            author: c.author.into(),
        }
    }
}

/// Create a comment on a post.
async fn create(
    AuthIdentity(external_id): AuthIdentity,
    State(state): State<AppState>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state.comment_service.create(&external_id, input).await?;
    Ok(ApiResponse::ok(comment.into()))
}

/// Comment list request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub post_id: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

const fn default_limit() -> u64 {
    20
}

/// List comments on a post, newest first.
async fn list(
    State(state): State<AppState>,
    Json(req): Json<ListRequest>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let limit = req.limit.min(100);
    let comments = state
        .comment_service
        .list_for_post(&req.post_id, limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(
        comments.into_iter().map(Into::into).collect(),
    ))
}

/// Create the comments router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/list", post(list))
}
