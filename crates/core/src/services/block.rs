//! Block service.
//!
//! Blocking is independent of the follow graph: an existing follow
//! relationship or pending follow request survives a block in either
//! direction.

use mingle_common::{AppError, AppResult, IdGenerator};
use mingle_db::{
    entities::block,
    repositories::{BlockRepository, UserRepository},
};
use sea_orm::Set;

/// Block service for business logic.
#[derive(Clone)]
pub struct BlockService {
    user_repo: UserRepository,
    block_repo: BlockRepository,
    id_gen: IdGenerator,
}

/// Result of a block toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSwitch {
    /// The target user is now blocked.
    Blocked,
    /// An existing block was removed.
    Unblocked,
}

impl BlockService {
    /// Create a new block service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, block_repo: BlockRepository) -> Self {
        Self {
            user_repo,
            block_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle the block state towards a target user.
    pub async fn switch_block(
        &self,
        external_id: &str,
        target_user_id: &str,
    ) -> AppResult<BlockSwitch> {
        let actor = self.user_repo.get_by_external_id(external_id).await?;

        if actor.id == target_user_id {
            return Err(AppError::Validation("Cannot block yourself".to_string()));
        }

        if self
            .block_repo
            .is_blocking(&actor.id, target_user_id)
            .await?
        {
            self.block_repo
                .delete_by_pair(&actor.id, target_user_id)
                .await?;
            tracing::debug!(blocker_id = %actor.id, blocked_id = %target_user_id, "Unblocked");
            return Ok(BlockSwitch::Unblocked);
        }

        let target = self.user_repo.get_by_id(target_user_id).await?;

        let model = block::ActiveModel {
            id: Set(self.id_gen.generate()),
            blocker_id: Set(actor.id.clone()),
            blocked_id: Set(target.id.clone()),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.block_repo.create(model).await?;
        tracing::debug!(blocker_id = %actor.id, blocked_id = %target.id, "Blocked");

        Ok(BlockSwitch::Blocked)
    }

    /// Check if a user is blocking another user.
    pub async fn is_blocking(&self, blocker_id: &str, blocked_id: &str) -> AppResult<bool> {
        self.block_repo.is_blocking(blocker_id, blocked_id).await
    }

    /// Get users that a user is blocking (paginated).
    pub async fn get_blocking(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<block::Model>> {
        self.block_repo.find_blocking(user_id, limit, until_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mingle_db::entities::user;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str, external_id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            external_id: external_id.to_string(),
            username: format!("user_{id}"),
            avatar_url: None,
            cover_url: None,
            name: None,
            surname: None,
            description: None,
            city: None,
            school: None,
            work: None,
            website: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_block(id: &str, blocker_id: &str, blocked_id: &str) -> block::Model {
        block::Model {
            id: id.to_string(),
            blocker_id: blocker_id.to_string(),
            blocked_id: blocked_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_switch_block_yourself_returns_validation_error() {
        let actor = create_test_user("u1", "ext_1");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[actor]])
                .into_connection(),
        );
        let block_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = BlockService::new(UserRepository::new(user_db), BlockRepository::new(block_db));
        let result = service.switch_block("ext_1", "u1").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_switch_block_creates_block() {
        let actor = create_test_user("u1", "ext_1");
        let target = create_test_user("u2", "ext_2");
        let created = create_test_block("b1", "u1", "u2");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[actor], [target]])
                .into_connection(),
        );
        let block_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<block::Model>::new()])
                .append_query_results([[created]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = BlockService::new(UserRepository::new(user_db), BlockRepository::new(block_db));
        let result = service.switch_block("ext_1", "u2").await.unwrap();

        assert_eq!(result, BlockSwitch::Blocked);
    }

    #[tokio::test]
    async fn test_switch_block_removes_existing_block() {
        let actor = create_test_user("u1", "ext_1");
        let existing = create_test_block("b1", "u1", "u2");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[actor]])
                .into_connection(),
        );
        let block_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing.clone()], [existing]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = BlockService::new(UserRepository::new(user_db), BlockRepository::new(block_db));
        let result = service.switch_block("ext_1", "u2").await.unwrap();

        assert_eq!(result, BlockSwitch::Unblocked);
    }

    #[tokio::test]
    async fn test_block_does_not_touch_follow_graph() {
        // Blocking must not cascade into follower or follow_request rows.
        // The service has no handle on those tables; the only statements
        // issued while blocking hit the user and block tables.
        let actor = create_test_user("u1", "ext_1");
        let target = create_test_user("u2", "ext_2");
        let created = create_test_block("b1", "u1", "u2");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[actor], [target]])
                .into_connection(),
        );
        let block_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<block::Model>::new()])
                .append_query_results([[created]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = BlockService::new(
            UserRepository::new(user_db),
            BlockRepository::new(Arc::clone(&block_db)),
        );
        service.switch_block("ext_1", "u2").await.unwrap();
        drop(service);

        let log = Arc::try_unwrap(block_db)
            .map_err(|_| ())
            .unwrap()
            .into_transaction_log();
        for txn in &log {
            let sql = format!("{txn:?}");
            assert!(!sql.contains("follower"));
            assert!(!sql.contains("follow_request"));
        }
    }
}
