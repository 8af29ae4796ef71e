//! Identity provisioning service.
//!
//! Mirrors identity-provider lifecycle events into the user table. The
//! webhook receiver verifies the event signature before anything here runs.

use mingle_common::{AppResult, IdGenerator};
use mingle_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;
use serde::Deserialize;

/// Default avatar for users provisioned without an image.
const DEFAULT_AVATAR: &str = "/noAvatar.png";

/// Default cover image for newly provisioned users.
const DEFAULT_COVER: &str = "/noCover.png";

/// A lifecycle event from the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityEvent {
    /// Event type, e.g. `user.created` or `user.updated`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Event payload.
    pub data: IdentityEventData,
}

/// Payload of an identity lifecycle event.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityEventData {
    /// The provider's stable user reference.
    pub id: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub image_url: Option<String>,
}

/// Outcome of applying an identity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningOutcome {
    /// A new user record was created.
    Created,
    /// An existing user record was updated.
    Updated,
    /// The event type is not handled; acknowledged without effect.
    Ignored,
}

/// Identity provisioning service.
#[derive(Clone)]
pub struct ProvisioningService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl ProvisioningService {
    /// Create a new provisioning service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Apply a verified identity event.
    ///
    /// `user.created` inserts a user seeded from the payload; `user.updated`
    /// refreshes username and avatar only. All other event types are
    /// acknowledged without effect.
    pub async fn apply(&self, event: IdentityEvent) -> AppResult<ProvisioningOutcome> {
        match event.kind.as_str() {
            "user.created" => self.create_user(event.data).await,
            "user.updated" => self.update_user(event.data).await,
            other => {
                tracing::debug!(event_type = %other, "Ignoring identity event");
                Ok(ProvisioningOutcome::Ignored)
            }
        }
    }

    async fn create_user(&self, data: IdentityEventData) -> AppResult<ProvisioningOutcome> {
        // The provider may omit the username; the external id is unique and
        // satisfies our username constraint as a fallback
        let username = data
            .username
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| data.id.clone());
        let avatar = data
            .image_url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_AVATAR.to_string());

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            external_id: Set(data.id.clone()),
            username: Set(username),
            avatar_url: Set(Some(avatar)),
            cover_url: Set(Some(DEFAULT_COVER.to_string())),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = %user.id, external_id = %user.external_id, "Provisioned user");

        Ok(ProvisioningOutcome::Created)
    }

    async fn update_user(&self, data: IdentityEventData) -> AppResult<ProvisioningOutcome> {
        let user = self.user_repo.get_by_external_id(&data.id).await?;
        let mut active: user::ActiveModel = user.into();

        if let Some(username) = data.username.filter(|u| !u.is_empty()) {
            active.username = Set(username);
        }
        active.avatar_url = Set(Some(
            data.image_url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
        ));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let user = self.user_repo.update(active).await?;
        tracing::info!(user_id = %user.id, external_id = %user.external_id, "Refreshed user from identity event");

        Ok(ProvisioningOutcome::Updated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str, external_id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            external_id: external_id.to_string(),
            username: username.to_string(),
            avatar_url: Some(DEFAULT_AVATAR.to_string()),
            cover_url: Some(DEFAULT_COVER.to_string()),
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

    #[tokio::test]
    async fn test_user_created_inserts_user() {
        let created = create_test_user("u1", "ext_1", "alice");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = ProvisioningService::new(UserRepository::new(user_db));

        let event = IdentityEvent {
            kind: "user.created".to_string(),
            data: IdentityEventData {
                id: "ext_1".to_string(),
                username: Some("alice".to_string()),
                image_url: None,
            },
        };
        let outcome = service.apply(event).await.unwrap();

        assert_eq!(outcome, ProvisioningOutcome::Created);
    }

    #[tokio::test]
    async fn test_user_updated_refreshes_existing_user() {
        let existing = create_test_user("u1", "ext_1", "alice");
        let refreshed = create_test_user("u1", "ext_1", "alice_new");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing], [refreshed]])
                .into_connection(),
        );

        let service = ProvisioningService::new(UserRepository::new(user_db));

        let event = IdentityEvent {
            kind: "user.updated".to_string(),
            data: IdentityEventData {
                id: "ext_1".to_string(),
                username: Some("alice_new".to_string()),
                image_url: Some("/avatars/new.png".to_string()),
            },
        };
        let outcome = service.apply(event).await.unwrap();

        assert_eq!(outcome, ProvisioningOutcome::Updated);
    }

    #[tokio::test]
    async fn test_unknown_event_type_is_ignored() {
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = ProvisioningService::new(UserRepository::new(user_db));

        let event = IdentityEvent {
            kind: "session.created".to_string(),
            data: IdentityEventData {
                id: "ext_1".to_string(),
                username: None,
                image_url: None,
            },
        };
        let outcome = service.apply(event).await.unwrap();

        assert_eq!(outcome, ProvisioningOutcome::Ignored);
    }

    #[test]
    fn test_event_deserializes_from_provider_payload() {
        let payload = r#"{
            "type": "user.created",
            "data": {
                "id": "user_2abc",
                "username": "alice",
                "image_url": "https://img.example.com/a.png",
                "first_name": "Alice"
            }
        }"#;

        let event: IdentityEvent = serde_json::from_str(payload).unwrap();

        assert_eq!(event.kind, "user.created");
        assert_eq!(event.data.id, "user_2abc");
        assert_eq!(event.data.username.as_deref(), Some("alice"));
    }
}
