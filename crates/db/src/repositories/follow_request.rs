//! Follow request repository.

use std::sync::Arc;

use crate::entities::{FollowRequest, follow_request, follower, user};
use mingle_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};

/// Follow request repository for database operations.
#[derive(Clone)]
pub struct FollowRequestRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRequestRepository {
    /// Create a new follow request repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a pending request by sender and receiver.
    pub async fn find_by_pair(
        &self,
        sender_id: &str,
        receiver_id: &str,
    ) -> AppResult<Option<follow_request::Model>> {
        FollowRequest::find()
            .filter(follow_request::Column::SenderId.eq(sender_id))
            .filter(follow_request::Column::ReceiverId.eq(receiver_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a pending request exists.
    pub async fn exists(&self, sender_id: &str, receiver_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(sender_id, receiver_id).await?.is_some())
    }

    /// Create a new follow request.
    pub async fn create(
        &self,
        model: follow_request::ActiveModel,
    ) -> AppResult<follow_request::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a pending request by pair. No-op if absent.
    pub async fn delete_by_pair(&self, sender_id: &str, receiver_id: &str) -> AppResult<()> {
        let request = self.find_by_pair(sender_id, receiver_id).await?;
        if let Some(r) = request {
            r.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Promote a pending request to a follow relationship.
    ///
    /// Deletes the request and inserts the follower edge in one
    /// transaction; the two rows are never observed coexisting or both
    /// absent mid-operation.
    pub async fn accept(
        &self,
        request_id: &str,
        edge: follower::ActiveModel,
    ) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        FollowRequest::delete_by_id(request_id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        crate::entities::Follower::insert(edge)
            .exec_without_returning(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get pending requests received by a user, joined with their senders
    /// (paginated).
    pub async fn find_received(
        &self,
        receiver_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<(follow_request::Model, Option<user::Model>)>> {
        let mut query = FollowRequest::find()
            .find_also_related(crate::entities::User)
            .filter(follow_request::Column::ReceiverId.eq(receiver_id))
            .order_by_desc(follow_request::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(follow_request::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    fn create_test_request(id: &str, sender_id: &str, receiver_id: &str) -> follow_request::Model {
        follow_request::Model {
            id: id.to_string(),
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_exists_true() {
        let request = create_test_request("r1", "u1", "u2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[request.clone()]])
                .into_connection(),
        );

        let repo = FollowRequestRepository::new(db);
        let result = repo.exists("u1", "u2").await.unwrap();

        assert!(result);
    }

    #[tokio::test]
    async fn test_exists_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow_request::Model>::new()])
                .into_connection(),
        );

        let repo = FollowRequestRepository::new(db);
        let result = repo.exists("u1", "u3").await.unwrap();

        assert!(!result);
    }

    #[tokio::test]
    async fn test_accept_deletes_request_and_inserts_edge() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let repo = FollowRequestRepository::new(Arc::clone(&db));
        let edge = follower::ActiveModel {
            id: Set("f1".to_string()),
            follower_id: Set("u1".to_string()),
            following_id: Set("u2".to_string()),
            created_at: Set(Utc::now().into()),
        };

        repo.accept("r1", edge).await.unwrap();
        drop(repo);

        // Both statements ran inside one transaction
        let log = Arc::try_unwrap(db)
            .map_err(|_| ())
            .unwrap()
            .into_transaction_log();
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_by_pair_is_noop_when_absent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow_request::Model>::new()])
                .into_connection(),
        );

        let repo = FollowRequestRepository::new(db);
        repo.delete_by_pair("u1", "u2").await.unwrap();
    }
}
