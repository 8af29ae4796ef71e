//! Like service.

use mingle_common::{AppResult, IdGenerator};
use mingle_db::{
    entities::like,
    repositories::{LikeRepository, PostRepository, UserRepository},
};
use sea_orm::Set;

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    user_repo: UserRepository,
    post_repo: PostRepository,
    like_repo: LikeRepository,
    id_gen: IdGenerator,
}

/// Result of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeSwitch {
    /// The post is now liked.
    Liked,
    /// An existing like was removed.
    Unliked,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        post_repo: PostRepository,
        like_repo: LikeRepository,
    ) -> Self {
        Self {
            user_repo,
            post_repo,
            like_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle the actor's like on a post.
    ///
    /// Uniqueness per (post, user) is backed by the unique index; a
    /// concurrent double-toggle by the same actor resolves last-write-wins.
    pub async fn switch_like(&self, external_id: &str, post_id: &str) -> AppResult<LikeSwitch> {
        let actor = self.user_repo.get_by_external_id(external_id).await?;
        let post = self.post_repo.get_by_id(post_id).await?;

        if self.like_repo.has_liked(&post.id, &actor.id).await? {
            self.like_repo.delete_by_pair(&post.id, &actor.id).await?;
            tracing::debug!(post_id = %post.id, user_id = %actor.id, "Unliked");
            return Ok(LikeSwitch::Unliked);
        }

        let model = like::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post.id.clone()),
            user_id: Set(actor.id.clone()),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.like_repo.create(model).await?;
        tracing::debug!(post_id = %post.id, user_id = %actor.id, "Liked");

        Ok(LikeSwitch::Liked)
    }

    /// Count likes on a post.
    pub async fn count_for_post(&self, post_id: &str) -> AppResult<u64> {
        self.like_repo.count_by_post(post_id).await
    }

    /// Check if a user has liked a post.
    pub async fn has_liked(&self, post_id: &str, user_id: &str) -> AppResult<bool> {
        self.like_repo.has_liked(post_id, user_id).await
    }
}
