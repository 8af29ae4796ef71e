//! API endpoints.

mod blocks;
mod comments;
mod follows;
mod likes;
mod posts;
mod stories;
mod users;
mod webhooks;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/follows", follows::router())
        .nest("/blocks", blocks::router())
        .nest("/likes", likes::router())
        .nest("/comments", comments::router())
        .nest("/posts", posts::router())
        .nest("/stories", stories::router())
        .nest("/users", users::router())
        .nest("/webhooks", webhooks::router())
}
