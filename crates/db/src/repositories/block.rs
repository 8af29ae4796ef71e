//! Block repository.

use std::sync::Arc;

use crate::entities::{Block, block};
use mingle_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Block repository for database operations.
#[derive(Clone)]
pub struct BlockRepository {
    db: Arc<DatabaseConnection>,
}

impl BlockRepository {
    /// Create a new block repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a block by blocker and blocked user.
    pub async fn find_by_pair(
        &self,
        blocker_id: &str,
        blocked_id: &str,
    ) -> AppResult<Option<block::Model>> {
        Block::find()
            .filter(block::Column::BlockerId.eq(blocker_id))
            .filter(block::Column::BlockedId.eq(blocked_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user is blocking another user.
    pub async fn is_blocking(&self, blocker_id: &str, blocked_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(blocker_id, blocked_id).await?.is_some())
    }

    /// Create a new block.
    pub async fn create(&self, model: block::ActiveModel) -> AppResult<block::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a block by pair. No-op if absent.
    pub async fn delete_by_pair(&self, blocker_id: &str, blocked_id: &str) -> AppResult<()> {
        let block = self.find_by_pair(blocker_id, blocked_id).await?;
        if let Some(b) = block {
            b.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Get users that a user is blocking (paginated).
    pub async fn find_blocking(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<block::Model>> {
        let mut query = Block::find()
            .filter(block::Column::BlockerId.eq(user_id))
            .order_by_desc(block::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(block::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
