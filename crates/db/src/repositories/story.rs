//! Story repository.

use std::sync::Arc;

use crate::entities::{Story, story, user};
use chrono::{DateTime, Utc};
use mingle_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Story repository for database operations.
#[derive(Clone)]
pub struct StoryRepository {
    db: Arc<DatabaseConnection>,
}

impl StoryRepository {
    /// Create a new story repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the story owned by a user, if any (expired or not).
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Option<story::Model>> {
        Story::find()
            .filter(story::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new story.
    pub async fn create(&self, model: story::ActiveModel) -> AppResult<story::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete the story owned by a user, if any.
    pub async fn delete_by_user(&self, user_id: &str) -> AppResult<()> {
        Story::delete_many()
            .filter(story::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get unexpired stories owned by any of the given users, joined with
    /// their owners.
    ///
    /// Expiry is enforced here by filtering; expired rows stay in the table.
    pub async fn find_active(
        &self,
        user_ids: &[String],
        now: DateTime<Utc>,
    ) -> AppResult<Vec<(story::Model, Option<user::Model>)>> {
        Story::find()
            .find_also_related(crate::entities::User)
            .filter(story::Column::ExpiresAt.gt(now))
            .filter(story::Column::UserId.is_in(user_ids.iter().map(String::as_str)))
            .order_by_desc(story::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_story(id: &str, user_id: &str) -> story::Model {
        story::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            image_url: "/stories/s.png".to_string(),
            expires_at: (Utc::now() + Duration::hours(24)).into(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_user_found() {
        let story = create_test_story("s1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[story.clone()]])
                .into_connection(),
        );

        let repo = StoryRepository::new(db);
        let result = repo.find_by_user("u1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, "s1");
    }

    #[tokio::test]
    async fn test_delete_by_user_is_noop_when_absent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = StoryRepository::new(db);
        repo.delete_by_user("u1").await.unwrap();
    }
}
