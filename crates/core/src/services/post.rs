//! Post service.

use mingle_common::{AppError, AppResult, IdGenerator};
use mingle_db::{
    entities::{post, user},
    repositories::{FollowerRepository, PostRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    user_repo: UserRepository,
    post_repo: PostRepository,
    follower_repo: FollowerRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 500))]
    pub text: String,

    #[validate(length(max = 1024))]
    pub image_url: Option<String>,
}

/// Post with author information.
#[derive(Debug, Clone)]
pub struct PostWithAuthor {
    pub post: post::Model,
    pub author: user::Model,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        post_repo: PostRepository,
        follower_repo: FollowerRepository,
    ) -> Self {
        Self {
            user_repo,
            post_repo,
            follower_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new post.
    pub async fn create(&self, external_id: &str, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        let actor = self.user_repo.get_by_external_id(external_id).await?;

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(actor.id.clone()),
            text: Set(input.text),
            image_url: Set(input.image_url),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let post = self.post_repo.create(model).await?;
        tracing::debug!(post_id = %post.id, user_id = %actor.id, "Created post");

        Ok(post)
    }

    /// Delete a post owned by the actor.
    ///
    /// Ownership is checked against the loaded row, never inferred from
    /// client input.
    pub async fn delete(&self, external_id: &str, post_id: &str) -> AppResult<()> {
        let actor = self.user_repo.get_by_external_id(external_id).await?;
        let post = self.post_repo.get_by_id(post_id).await?;

        if post.user_id != actor.id {
            return Err(AppError::Forbidden(
                "Cannot delete another user's post".to_string(),
            ));
        }

        self.post_repo.delete_by_id(&post.id).await?;
        tracing::debug!(post_id = %post.id, user_id = %actor.id, "Deleted post");

        Ok(())
    }

    /// Get the actor's feed: posts by the actor and everyone they follow,
    /// newest first, with authors.
    pub async fn feed(
        &self,
        external_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<PostWithAuthor>> {
        let actor = self.user_repo.get_by_external_id(external_id).await?;

        let mut user_ids = self.follower_repo.find_following_ids(&actor.id).await?;
        user_ids.push(actor.id);

        let rows = self.post_repo.find_feed(&user_ids, limit, until_id).await?;

        Ok(rows
            .into_iter()
            .filter_map(|(post, author)| author.map(|author| PostWithAuthor { post, author }))
            .collect())
    }

    /// Get one user's posts for their profile page, newest first.
    pub async fn by_username(
        &self,
        username: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<PostWithAuthor>> {
        let owner = self.user_repo.get_by_username(username).await?;
        let posts = self
            .post_repo
            .find_by_user(&owner.id, limit, until_id)
            .await?;

        Ok(posts
            .into_iter()
            .map(|post| PostWithAuthor {
                post,
                author: owner.clone(),
            })
            .collect())
    }
}
