use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, Router},
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use crate::{
    config::Config,
    services::{
        AuthService, BookmarkService, CommentService, Database, FollowService, LikeService,
        MediaService, PostService, SearchService, UserService,
    },
    state::AppState,
};

/// Wire up the database and every service into the shared application state.
pub async fn build_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let db = Arc::new(Database::new(&config).await?);
    db.verify_connection().await?;

    let auth_service = AuthService::new(&config).await?;
    let user_service = UserService::new(db.clone()).await?;
    let post_service = PostService::new(db.clone()).await?;
    let like_service = LikeService::new(db.clone()).await?;
    let bookmark_service = BookmarkService::new(db.clone()).await?;
    let comment_service = CommentService::new(db.clone()).await?;
    let follow_service = FollowService::new(db.clone()).await?;
    let search_service = SearchService::new(db.clone(), &config).await?;
    let media_service = MediaService::new(&config).await?;

    Ok(Arc::new(AppState {
        config,
        db: (*db).clone(),
        auth_service,
        user_service,
        post_service,
        like_service,
        bookmark_service,
        comment_service,
        follow_service,
        search_service,
        media_service,
    }))
}

/// Build the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_origin(
            state
                .config
                .cors_allowed_origins
                .split(',')
                .filter_map(|origin| origin.trim().parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        );

    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .nest("/api/users", routes::users::router())
        .nest("/api/posts", routes::posts::router())
        .nest("/api/comments", routes::comments::router())
        .nest("/api/bookmarks", routes::bookmarks::router())
        .nest("/api/follows", routes::follows::router())
        .nest("/api/search", routes::search::router())
        .nest("/api/media", routes::media::router())
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            utils::middleware::auth_middleware,
        ))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "Snapfeed is running!"
}
