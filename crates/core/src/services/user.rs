//! User profile service.

use mingle_common::AppResult;
use mingle_db::{
    entities::user,
    repositories::{
        BlockRepository, FollowRequestRepository, FollowerRepository, PostRepository,
        UserRepository,
    },
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// User profile service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    follower_repo: FollowerRepository,
    follow_request_repo: FollowRequestRepository,
    block_repo: BlockRepository,
    post_repo: PostRepository,
}

/// Input for updating the actor's profile.
///
/// All fields are optional; fields submitted as empty strings are dropped
/// before validation, so an empty value never clears a stored field.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(max = 60))]
    pub name: Option<String>,

    #[validate(length(max = 60))]
    pub surname: Option<String>,

    #[validate(length(max = 255))]
    pub description: Option<String>,

    #[validate(length(max = 60))]
    pub city: Option<String>,

    #[validate(length(max = 60))]
    pub school: Option<String>,

    #[validate(length(max = 60))]
    pub work: Option<String>,

    #[validate(length(max = 100), url)]
    pub website: Option<String>,

    #[validate(length(max = 1024))]
    pub cover_url: Option<String>,
}

impl UpdateProfileInput {
    /// Drop fields submitted as empty strings (partial-update semantics).
    #[must_use]
    pub fn normalized(self) -> Self {
        fn keep(field: Option<String>) -> Option<String> {
            field.filter(|v| !v.is_empty())
        }

        Self {
            name: keep(self.name),
            surname: keep(self.surname),
            description: keep(self.description),
            city: keep(self.city),
            school: keep(self.school),
            work: keep(self.work),
            website: keep(self.website),
            cover_url: keep(self.cover_url),
        }
    }
}

/// A user profile with its social-graph counts.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub user: user::Model,
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
}

/// The actor's relation to another user, as shown on a profile card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationFlags {
    pub following: bool,
    pub request_sent: bool,
    pub blocked: bool,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        follower_repo: FollowerRepository,
        follow_request_repo: FollowRequestRepository,
        block_repo: BlockRepository,
        post_repo: PostRepository,
    ) -> Self {
        Self {
            user_repo,
            follower_repo,
            follow_request_repo,
            block_repo,
            post_repo,
        }
    }

    /// Update the actor's profile.
    ///
    /// Validation runs before any write; a single malformed field fails the
    /// whole update. Absent and empty fields are left untouched.
    pub async fn update_profile(
        &self,
        external_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        let input = input.normalized();
        input.validate()?;

        let user = self.user_repo.get_by_external_id(external_id).await?;
        let mut active: user::ActiveModel = user.into();

        if let Some(name) = input.name {
            active.name = Set(Some(name));
        }
        if let Some(surname) = input.surname {
            active.surname = Set(Some(surname));
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(city) = input.city {
            active.city = Set(Some(city));
        }
        if let Some(school) = input.school {
            active.school = Set(Some(school));
        }
        if let Some(work) = input.work {
            active.work = Set(Some(work));
        }
        if let Some(website) = input.website {
            active.website = Set(Some(website));
        }
        if let Some(cover_url) = input.cover_url {
            active.cover_url = Set(Some(cover_url));
        }

        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Get a user by username.
    pub async fn get_by_username(&self, username: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_username(username).await
    }

    /// Get a user by the identity provider's external reference.
    pub async fn get_by_external_id(&self, external_id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_external_id(external_id).await
    }

    /// Get a user's profile with follower/following/post counts.
    pub async fn profile(&self, username: &str) -> AppResult<ProfileView> {
        let user = self.user_repo.get_by_username(username).await?;

        let followers = self.follower_repo.count_followers(&user.id).await?;
        let following = self.follower_repo.count_following(&user.id).await?;
        let posts = self.post_repo.count_by_user(&user.id).await?;

        Ok(ProfileView {
            user,
            followers,
            following,
            posts,
        })
    }

    /// Get the actor's relation to a target user.
    pub async fn relation(
        &self,
        external_id: &str,
        target_user_id: &str,
    ) -> AppResult<RelationFlags> {
        let actor = self.user_repo.get_by_external_id(external_id).await?;

        let following = self
            .follower_repo
            .is_following(&actor.id, target_user_id)
            .await?;
        let request_sent = self
            .follow_request_repo
            .exists(&actor.id, target_user_id)
            .await?;
        let blocked = self
            .block_repo
            .is_blocking(&actor.id, target_user_id)
            .await?;

        Ok(RelationFlags {
            following,
            request_sent,
            blocked,
        })
    }
}
