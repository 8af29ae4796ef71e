//! Comment service.

use mingle_common::{AppResult, IdGenerator};
use mingle_db::{
    entities::{comment, user},
    repositories::{CommentRepository, PostRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    user_repo: UserRepository,
    post_repo: PostRepository,
    comment_repo: CommentRepository,
    id_gen: IdGenerator,
}

/// Input for creating a comment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    pub post_id: String,

    #[validate(length(min = 1, max = 255))]
    pub text: String,
}

/// Comment with author information, for immediate client display.
#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub comment: comment::Model,
    pub author: user::Model,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        post_repo: PostRepository,
        comment_repo: CommentRepository,
    ) -> Self {
        Self {
            user_repo,
            post_repo,
            comment_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a comment on a post.
    ///
    /// Any authenticated user may comment on any post; there is no block
    /// or ownership check against the post's owner.
    pub async fn create(
        &self,
        external_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<CommentWithAuthor> {
        input.validate()?;

        let actor = self.user_repo.get_by_external_id(external_id).await?;
        let post = self.post_repo.get_by_id(&input.post_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post.id.clone()),
            user_id: Set(actor.id.clone()),
            text: Set(input.text),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let comment = self.comment_repo.create(model).await?;
        tracing::debug!(post_id = %post.id, comment_id = %comment.id, "Created comment");

        Ok(CommentWithAuthor {
            comment,
            author: actor,
        })
    }

    /// Get comments on a post, newest first, with their authors.
    pub async fn list_for_post(
        &self,
        post_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<CommentWithAuthor>> {
        let rows = self
            .comment_repo
            .find_by_post(post_id, limit, until_id)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(comment, author)| {
                author.map(|author| CommentWithAuthor { comment, author })
            })
            .collect())
    }

    /// Count comments on a post.
    pub async fn count_for_post(&self, post_id: &str) -> AppResult<u64> {
        self.comment_repo.count_by_post(post_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mingle_common::AppError;
    use mingle_db::entities::post;
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

    fn create_test_post(id: &str, user_id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            text: "hello".to_string(),
            image_url: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_comment(id: &str, post_id: &str, user_id: &str) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
            text: "nice".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_empty_text_fails_validation() {
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let post_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let comment_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = CommentService::new(
            UserRepository::new(user_db),
            PostRepository::new(post_db),
            CommentRepository::new(comment_db),
        );

        let input = CreateCommentInput {
            post_id: "p1".to_string(),
            text: String::new(),
        };
        let result = service.create("ext_1", input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_overlong_text_fails_validation() {
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let post_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let comment_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = CommentService::new(
            UserRepository::new(user_db),
            PostRepository::new(post_db),
            CommentRepository::new(comment_db),
        );

        let input = CreateCommentInput {
            post_id: "p1".to_string(),
            text: "x".repeat(256),
        };
        let result = service.create("ext_1", input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_returns_comment_with_author() {
        let actor = create_test_user("u1", "ext_1");
        let post = create_test_post("p1", "u2");
        let created = create_test_comment("c1", "p1", "u1");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[actor]])
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .into_connection(),
        );
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = CommentService::new(
            UserRepository::new(user_db),
            PostRepository::new(post_db),
            CommentRepository::new(comment_db),
        );

        let input = CreateCommentInput {
            post_id: "p1".to_string(),
            text: "nice".to_string(),
        };
        let result = service.create("ext_1", input).await.unwrap();

        assert_eq!(result.comment.id, "c1");
        assert_eq!(result.author.id, "u1");
    }
}
