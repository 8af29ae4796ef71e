//! Mingle server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use mingle_api::{TokenVerifier, middleware::AppState, router as api_router};
use mingle_common::{Config, WebhookVerifier};
use mingle_core::{
    BlockService, CommentService, FollowService, LikeService, PostService, ProvisioningService,
    StoryService, UserService,
};
use mingle_db::repositories::{
    BlockRepository, CommentRepository, FollowRequestRepository, FollowerRepository,
    LikeRepository, PostRepository, StoryRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mingle=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting mingle server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = mingle_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    mingle_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let story_repo = StoryRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));
    let follower_repo = FollowerRepository::new(Arc::clone(&db));
    let follow_request_repo = FollowRequestRepository::new(Arc::clone(&db));
    let block_repo = BlockRepository::new(Arc::clone(&db));

    // Initialize services
    let follow_service = FollowService::new(
        user_repo.clone(),
        follower_repo.clone(),
        follow_request_repo.clone(),
    );
    let block_service = BlockService::new(user_repo.clone(), block_repo.clone());
    let like_service = LikeService::new(user_repo.clone(), post_repo.clone(), like_repo);
    let comment_service =
        CommentService::new(user_repo.clone(), post_repo.clone(), comment_repo);
    let post_service = PostService::new(
        user_repo.clone(),
        post_repo.clone(),
        follower_repo.clone(),
    );
    let story_service = StoryService::new(user_repo.clone(), story_repo, follower_repo.clone());
    let user_service = UserService::new(
        user_repo.clone(),
        follower_repo,
        follow_request_repo,
        block_repo,
        post_repo,
    );
    let provisioning_service = ProvisioningService::new(user_repo);

    // Identity provider integration
    let token_verifier = TokenVerifier::new(&config.identity)?;
    let webhook_verifier = WebhookVerifier::new(&config.identity.webhook_secret)?;

    // Create app state
    let state = AppState {
        follow_service,
        block_service,
        like_service,
        comment_service,
        post_service,
        story_service,
        user_service,
        provisioning_service,
        token_verifier,
        webhook_verifier,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            mingle_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
