//! Follow service.

use mingle_common::{AppError, AppResult, IdGenerator};
use mingle_db::{
    entities::{follow_request, follower, user},
    repositories::{FollowRequestRepository, FollowerRepository, UserRepository},
};
use sea_orm::Set;

/// Follow service for business logic.
#[derive(Clone)]
pub struct FollowService {
    user_repo: UserRepository,
    follower_repo: FollowerRepository,
    follow_request_repo: FollowRequestRepository,
    id_gen: IdGenerator,
}

/// Result of a follow-state toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowSwitch {
    /// An existing follow relationship was removed.
    Unfollowed,
    /// A pending follow request was canceled.
    RequestCanceled,
    /// A new follow request was sent.
    Requested,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        follower_repo: FollowerRepository,
        follow_request_repo: FollowRequestRepository,
    ) -> Self {
        Self {
            user_repo,
            follower_repo,
            follow_request_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle the follow state towards a target user.
    ///
    /// Cycles through three states, in priority order: an existing follow
    /// relationship is removed; else a pending request is canceled; else a
    /// new request is sent. Exactly one branch runs per call, so two calls
    /// in a row land on different states.
    pub async fn switch_follow(
        &self,
        external_id: &str,
        target_user_id: &str,
    ) -> AppResult<FollowSwitch> {
        let actor = self.user_repo.get_by_external_id(external_id).await?;

        if actor.id == target_user_id {
            return Err(AppError::Validation("Cannot follow yourself".to_string()));
        }

        if self
            .follower_repo
            .is_following(&actor.id, target_user_id)
            .await?
        {
            self.follower_repo
                .delete_by_pair(&actor.id, target_user_id)
                .await?;
            tracing::debug!(follower_id = %actor.id, following_id = %target_user_id, "Unfollowed");
            return Ok(FollowSwitch::Unfollowed);
        }

        if self
            .follow_request_repo
            .exists(&actor.id, target_user_id)
            .await?
        {
            self.follow_request_repo
                .delete_by_pair(&actor.id, target_user_id)
                .await?;
            tracing::debug!(sender_id = %actor.id, receiver_id = %target_user_id, "Canceled follow request");
            return Ok(FollowSwitch::RequestCanceled);
        }

        // No relationship yet; the target must exist before a request is sent
        let target = self.user_repo.get_by_id(target_user_id).await?;

        let model = follow_request::ActiveModel {
            id: Set(self.id_gen.generate()),
            sender_id: Set(actor.id.clone()),
            receiver_id: Set(target.id.clone()),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.follow_request_repo.create(model).await?;
        tracing::debug!(sender_id = %actor.id, receiver_id = %target.id, "Sent follow request");

        Ok(FollowSwitch::Requested)
    }

    /// Accept a pending follow request from a sender.
    ///
    /// The request is deleted and the follow relationship created in one
    /// transaction. No-op when no matching request exists.
    pub async fn accept_request(
        &self,
        receiver_external_id: &str,
        sender_external_id: &str,
    ) -> AppResult<()> {
        let receiver = self
            .user_repo
            .get_by_external_id(receiver_external_id)
            .await?;
        let sender = self
            .user_repo
            .get_by_external_id(sender_external_id)
            .await?;

        let Some(request) = self
            .follow_request_repo
            .find_by_pair(&sender.id, &receiver.id)
            .await?
        else {
            return Ok(());
        };

        let edge = follower::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(sender.id.clone()),
            following_id: Set(receiver.id.clone()),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.follow_request_repo.accept(&request.id, edge).await?;
        tracing::debug!(sender_id = %sender.id, receiver_id = %receiver.id, "Accepted follow request");

        Ok(())
    }

    /// Decline a pending follow request from a sender.
    ///
    /// No-op when no matching request exists.
    pub async fn decline_request(
        &self,
        receiver_external_id: &str,
        sender_external_id: &str,
    ) -> AppResult<()> {
        let receiver = self
            .user_repo
            .get_by_external_id(receiver_external_id)
            .await?;
        let sender = self
            .user_repo
            .get_by_external_id(sender_external_id)
            .await?;

        self.follow_request_repo
            .delete_by_pair(&sender.id, &receiver.id)
            .await?;
        tracing::debug!(sender_id = %sender.id, receiver_id = %receiver.id, "Declined follow request");

        Ok(())
    }

    /// Get pending follow requests received by the actor, joined with
    /// their senders.
    pub async fn pending_requests(
        &self,
        external_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<(follow_request::Model, Option<user::Model>)>> {
        let actor = self.user_repo.get_by_external_id(external_id).await?;
        self.follow_request_repo
            .find_received(&actor.id, limit, until_id)
            .await
    }

    /// Check if a user is following another.
    pub async fn is_following(&self, follower_id: &str, following_id: &str) -> AppResult<bool> {
        self.follower_repo
            .is_following(follower_id, following_id)
            .await
    }

    /// Get followers of a user.
    pub async fn get_followers(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<follower::Model>> {
        self.follower_repo
            .find_followers(user_id, limit, until_id)
            .await
    }

    /// Get users that a user is following.
    pub async fn get_following(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<follower::Model>> {
        self.follower_repo
            .find_following(user_id, limit, until_id)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
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

    fn create_test_edge(id: &str, follower_id: &str, following_id: &str) -> follower::Model {
        follower::Model {
            id: id.to_string(),
            follower_id: follower_id.to_string(),
            following_id: following_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_request(id: &str, sender_id: &str, receiver_id: &str) -> follow_request::Model {
        follow_request::Model {
            id: id.to_string(),
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    #[tokio::test]
    async fn test_switch_follow_yourself_returns_validation_error() {
        let actor = create_test_user("u1", "ext_1");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[actor]])
                .into_connection(),
        );
        let follower_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let request_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FollowService::new(
            UserRepository::new(user_db),
            FollowerRepository::new(follower_db),
            FollowRequestRepository::new(request_db),
        );

        let result = service.switch_follow("ext_1", "u1").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_switch_follow_unknown_actor_is_user_not_found() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let follower_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let request_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FollowService::new(
            UserRepository::new(user_db),
            FollowerRepository::new(follower_db),
            FollowRequestRepository::new(request_db),
        );

        let result = service.switch_follow("ext_missing", "u2").await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_switch_follow_unfollows_existing_relationship() {
        let actor = create_test_user("u1", "ext_1");
        let edge = create_test_edge("f1", "u1", "u2");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[actor]])
                .into_connection(),
        );
        // One lookup for the toggle decision, one inside delete_by_pair
        let follower_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge.clone()], [edge]])
                .append_exec_results([exec_ok()])
                .into_connection(),
        );
        let request_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FollowService::new(
            UserRepository::new(user_db),
            FollowerRepository::new(follower_db),
            FollowRequestRepository::new(request_db),
        );

        let result = service.switch_follow("ext_1", "u2").await.unwrap();

        assert_eq!(result, FollowSwitch::Unfollowed);
    }

    #[tokio::test]
    async fn test_switch_follow_cancels_pending_request() {
        let actor = create_test_user("u1", "ext_1");
        let request = create_test_request("r1", "u1", "u2");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[actor]])
                .into_connection(),
        );
        let follower_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follower::Model>::new()])
                .into_connection(),
        );
        let request_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[request.clone()], [request]])
                .append_exec_results([exec_ok()])
                .into_connection(),
        );

        let service = FollowService::new(
            UserRepository::new(user_db),
            FollowerRepository::new(follower_db),
            FollowRequestRepository::new(request_db),
        );

        let result = service.switch_follow("ext_1", "u2").await.unwrap();

        assert_eq!(result, FollowSwitch::RequestCanceled);
    }

    #[tokio::test]
    async fn test_switch_follow_sends_request_when_no_relationship() {
        let actor = create_test_user("u1", "ext_1");
        let target = create_test_user("u2", "ext_2");
        let created = create_test_request("r1", "u1", "u2");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[actor], [target]])
                .into_connection(),
        );
        let follower_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follower::Model>::new()])
                .into_connection(),
        );
        let request_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow_request::Model>::new()])
                .append_query_results([[created]])
                .append_exec_results([exec_ok()])
                .into_connection(),
        );

        let service = FollowService::new(
            UserRepository::new(user_db),
            FollowerRepository::new(follower_db),
            FollowRequestRepository::new(request_db),
        );

        let result = service.switch_follow("ext_1", "u2").await.unwrap();

        assert_eq!(result, FollowSwitch::Requested);
    }

    #[tokio::test]
    async fn test_accept_request_promotes_to_follower() {
        let receiver = create_test_user("u2", "ext_2");
        let sender = create_test_user("u1", "ext_1");
        let request = create_test_request("r1", "u1", "u2");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[receiver], [sender]])
                .into_connection(),
        );
        let follower_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let request_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[request]])
                .append_exec_results([exec_ok(), exec_ok()])
                .into_connection(),
        );

        let service = FollowService::new(
            UserRepository::new(user_db),
            FollowerRepository::new(follower_db),
            FollowRequestRepository::new(request_db),
        );

        service.accept_request("ext_2", "ext_1").await.unwrap();
    }

    #[tokio::test]
    async fn test_accept_request_is_noop_without_pending_request() {
        let receiver = create_test_user("u2", "ext_2");
        let sender = create_test_user("u1", "ext_1");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[receiver], [sender]])
                .into_connection(),
        );
        let follower_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let request_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow_request::Model>::new()])
                .into_connection(),
        );

        let service = FollowService::new(
            UserRepository::new(user_db),
            FollowerRepository::new(follower_db),
            FollowRequestRepository::new(request_db),
        );

        service.accept_request("ext_2", "ext_1").await.unwrap();
    }

    #[tokio::test]
    async fn test_decline_request_is_noop_without_pending_request() {
        let receiver = create_test_user("u2", "ext_2");
        let sender = create_test_user("u1", "ext_1");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[receiver], [sender]])
                .into_connection(),
        );
        let follower_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let request_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow_request::Model>::new()])
                .into_connection(),
        );

        let service = FollowService::new(
            UserRepository::new(user_db),
            FollowerRepository::new(follower_db),
            FollowRequestRepository::new(request_db),
        );

        service.decline_request("ext_2", "ext_1").await.unwrap();
    }
}
