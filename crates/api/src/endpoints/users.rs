//! User profile endpoints.

use axum::{Json, Router, extract::State, routing::post};
use mingle_common::AppResult;
use mingle_core::{ProfileView, RelationFlags, UpdateProfileInput};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthIdentity, middleware::AppState, response::ApiResponse};

/// Public profile fields of a user, embedded in other responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<mingle_db::entities::user::Model> for UserSummaryResponse {
    fn from(u: mingle_db::entities::user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            name: u.name,
            surname: u.surname,
            avatar_url: u.avatar_url,
        }
    }
}

/// Full profile response with social-graph counts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub school: Option<String>,
    pub work: Option<String>,
    pub website: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_url: Option<String>,
    pub created_at: String,
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
}

impl From<ProfileView> for ProfileResponse {
    fn from(p: ProfileView) -> Self {
        Self {
            id: p.user.id,
            username: p.user.username,
            name: p.user.name,
            surname: p.user.surname,
            description: p.user.description,
            city: p.user.city,
            school: p.user.school,
            work: p.user.work,
            website: p.user.website,
            avatar_url: p.user.avatar_url,
            cover_url: p.user.cover_url,
            created_at: p.user.created_at.to_rfc3339(),
            followers: p.followers,
            following: p.following,
            posts: p.posts,
        }
    }
}

/// Show profile request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowRequest {
    pub username: String,
}

/// Show a user's profile with counts.
async fn show(
    State(state): State<AppState>,
    Json(req): Json<ShowRequest>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let profile = state.user_service.profile(&req.username).await?;
    Ok(ApiResponse::ok(profile.into()))
}

/// Relation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationRequest {
    pub user_id: String,
}

/// Relation response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationResponse {
    pub following: bool,
    pub request_sent: bool,
    pub blocked: bool,
}

impl From<RelationFlags> for RelationResponse {
    fn from(f: RelationFlags) -> Self {
        Self {
            following: f.following,
            request_sent: f.request_sent,
            blocked: f.blocked,
        }
    }
}

/// Get the actor's relation to another user.
async fn relation(
    AuthIdentity(external_id): AuthIdentity,
    State(state): State<AppState>,
    Json(req): Json<RelationRequest>,
) -> AppResult<ApiResponse<RelationResponse>> {
    let flags = state
        .user_service
        .relation(&external_id, &req.user_id)
        .await?;
    Ok(ApiResponse::ok(flags.into()))
}

/// Update the actor's profile.
async fn update_profile(
    AuthIdentity(external_id): AuthIdentity,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<UserSummaryResponse>> {
    let user = state
        .user_service
        .update_profile(&external_id, input)
        .await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Create the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/show", post(show))
        .route("/relation", post(relation))
        .route("/profile/update", post(update_profile))
}
