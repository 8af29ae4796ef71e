//! Post endpoints.

use axum::{Json, Router, extract::State, routing::post};
use mingle_common::AppResult;
use mingle_core::{CreatePostInput, PostWithAuthor};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthIdentity, middleware::AppState, response::ApiResponse};

use super::users::UserSummaryResponse;

/// Post response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub user_id: String,
    pub text: String,
    pub image_url: Option<String>,
    pub created_at: String,
}

impl From<mingle_db::entities::post::Model> for PostResponse {
    fn from(p: mingle_db::entities::post::Model) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            text: p.text,
            image_url: p.image_url,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// Post with author, as rendered in feeds.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItemResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub author: UserSummaryResponse,
}

impl From<PostWithAuthor> for FeedItemResponse {
    fn from(p: PostWithAuthor) -> Self {
        Self {
            post: p.post.into(),
            author: p.author.into(),
        }
    }
}

/// Create a new post.
async fn create(
    AuthIdentity(external_id): AuthIdentity,
    State(state): State<AppState>,
    Json(input): Json<CreatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.post_service.create(&external_id, input).await?;
    Ok(ApiResponse::ok(post.into()))
}

/// Post deletion request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    pub post_id: String,
}

/// Delete a post owned by the actor.
async fn delete(
    AuthIdentity(external_id): AuthIdentity,
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> AppResult<ApiResponse<()>> {
    state.post_service.delete(&external_id, &req.post_id).await?;
    Ok(ApiResponse::ok(()))
}

/// Feed request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

const fn default_limit() -> u64 {
    20
}

/// Get the actor's feed.
async fn feed(
    AuthIdentity(external_id): AuthIdentity,
    State(state): State<AppState>,
    Json(req): Json<FeedRequest>,
) -> AppResult<ApiResponse<Vec<FeedItemResponse>>> {
    let limit = req.limit.min(100);
    let posts = state
        .post_service
        .feed(&external_id, limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(posts.into_iter().map(Into::into).collect()))
}

/// Profile posts request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByUserRequest {
    pub username: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

/// Get one user's posts for their profile page.
async fn by_user(
    State(state): State<AppState>,
    Json(req): Json<ByUserRequest>,
) -> AppResult<ApiResponse<Vec<FeedItemResponse>>> {
    let limit = req.limit.min(100);
    let posts = state
        .post_service
        .by_username(&req.username, limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(posts.into_iter().map(Into::into).collect()))
}

/// Create the posts router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/delete", post(delete))
        .route("/feed", post(feed))
        .route("/by-user", post(by_user))
}
