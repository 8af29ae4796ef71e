//! Story service.

use chrono::{Duration, Utc};
use mingle_common::{AppResult, IdGenerator};
use mingle_db::{
    entities::{story, user},
    repositories::{FollowerRepository, StoryRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// How long a story stays visible after creation.
const STORY_TTL_HOURS: i64 = 24;

/// Story service for business logic.
#[derive(Clone)]
pub struct StoryService {
    user_repo: UserRepository,
    story_repo: StoryRepository,
    follower_repo: FollowerRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new story.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoryInput {
    #[validate(length(min = 1, max = 1024))]
    pub image_url: String,
}

/// Story with owner information.
#[derive(Debug, Clone)]
pub struct StoryWithOwner {
    pub story: story::Model,
    pub owner: user::Model,
}

impl StoryService {
    /// Create a new story service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        story_repo: StoryRepository,
        follower_repo: FollowerRepository,
    ) -> Self {
        Self {
            user_repo,
            story_repo,
            follower_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new story for the actor.
    ///
    /// A user has at most one story: any existing story is deleted first,
    /// whether or not it has expired.
    pub async fn create(
        &self,
        external_id: &str,
        input: CreateStoryInput,
    ) -> AppResult<story::Model> {
        input.validate()?;

        let actor = self.user_repo.get_by_external_id(external_id).await?;

        self.story_repo.delete_by_user(&actor.id).await?;

        let now = Utc::now();
        let model = story::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(actor.id.clone()),
            image_url: Set(input.image_url),
            expires_at: Set((now + Duration::hours(STORY_TTL_HOURS)).into()),
            created_at: Set(now.into()),
        };

        let story = self.story_repo.create(model).await?;
        tracing::debug!(story_id = %story.id, user_id = %actor.id, "Created story");

        Ok(story)
    }

    /// Get unexpired stories visible to the actor: their own and those of
    /// users they follow.
    pub async fn active(&self, external_id: &str) -> AppResult<Vec<StoryWithOwner>> {
        let actor = self.user_repo.get_by_external_id(external_id).await?;

        let mut user_ids = self.follower_repo.find_following_ids(&actor.id).await?;
        user_ids.push(actor.id);

        let rows = self.story_repo.find_active(&user_ids, Utc::now()).await?;

        Ok(rows
            .into_iter()
            .filter_map(|(story, owner)| owner.map(|owner| StoryWithOwner { story, owner }))
            .collect())
    }
}
