//! Follower repository.

use std::sync::Arc;

use crate::entities::{Follower, follower};
use mingle_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Follower repository for database operations.
#[derive(Clone)]
pub struct FollowerRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowerRepository {
    /// Create a new follower repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a follow relationship by follower and followed user.
    pub async fn find_by_pair(
        &self,
        follower_id: &str,
        following_id: &str,
    ) -> AppResult<Option<follower::Model>> {
        Follower::find()
            .filter(follower::Column::FollowerId.eq(follower_id))
            .filter(follower::Column::FollowingId.eq(following_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user is following another user.
    pub async fn is_following(&self, follower_id: &str, following_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(follower_id, following_id).await?.is_some())
    }

    /// Create a new follow relationship.
    pub async fn create(&self, model: follower::ActiveModel) -> AppResult<follower::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a follow relationship by pair.
    pub async fn delete_by_pair(&self, follower_id: &str, following_id: &str) -> AppResult<()> {
        let edge = self.find_by_pair(follower_id, following_id).await?;
        if let Some(f) = edge {
            f.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Get users that are following a user (paginated).
    pub async fn find_followers(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<follower::Model>> {
        let mut query = Follower::find()
            .filter(follower::Column::FollowingId.eq(user_id))
            .order_by_desc(follower::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(follower::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get users that a user is following (paginated).
    pub async fn find_following(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<follower::Model>> {
        let mut query = Follower::find()
            .filter(follower::Column::FollowerId.eq(user_id))
            .order_by_desc(follower::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(follower::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the IDs of all users a user is following.
    ///
    /// Used to scope feed and story queries.
    pub async fn find_following_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        Follower::find()
            .select_only()
            .column(follower::Column::FollowingId)
            .filter(follower::Column::FollowerId.eq(user_id))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count followers of a user.
    pub async fn count_followers(&self, user_id: &str) -> AppResult<u64> {
        Follower::find()
            .filter(follower::Column::FollowingId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count users a user is following.
    pub async fn count_following(&self, user_id: &str) -> AppResult<u64> {
        Follower::find()
            .filter(follower::Column::FollowerId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
