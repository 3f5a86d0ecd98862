#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use tempfile::TempDir;

use snapfeed::{
    build_state,
    config::Config,
    models::post::{CreatePostRequest, Post},
    models::user::User,
    services::auth::{Claims, Identity},
    state::AppState,
};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// Config pointing at a throwaway SQLite file and upload directory inside
/// `dir`. Keep the TempDir alive for as long as the state is in use.
pub fn test_config(dir: &TempDir) -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        environment: "test".to_string(),
        log_level: "debug".to_string(),
        database_url: format!("sqlite://{}", dir.path().join("test.db").display()),
        database_max_connections: 5,
        auth_service_url: "http://localhost:9".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        upload_dir: dir.path().join("uploads").display().to_string(),
        public_base_url: "http://localhost:3000".to_string(),
        max_upload_size: 1024 * 1024,
        allowed_image_types: "jpeg,jpg,png,gif,webp".to_string(),
        max_caption_length: 2200,
        max_comment_length: 2000,
        max_bio_length: 160,
        default_posts_per_page: 20,
        default_comments_per_page: 50,
        search_min_length: 2,
        search_max_results: 100,
        rate_limit_requests: 100,
        cors_allowed_origins: "http://localhost:3001".to_string(),
    }
}

pub async fn test_state() -> (Arc<AppState>, TempDir) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let state = build_state(test_config(&dir))
        .await
        .expect("failed to build test state");
    (state, dir)
}

pub async fn seed_user(state: &Arc<AppState>, email: &str, name: &str) -> User {
    state
        .user_service
        .resolve_user(&Identity {
            external_id: format!("ext-{}", email),
            email: email.to_string(),
            name: Some(name.to_string()),
            image: None,
        })
        .await
        .expect("failed to seed user")
}

pub async fn seed_post(state: &Arc<AppState>, user_id: &str, caption: &str) -> Post {
    state
        .post_service
        .create_post(
            user_id,
            CreatePostRequest {
                caption: Some(caption.to_string()),
                tags: vec!["test".to_string()],
                image_url: "http://localhost:3000/uploads/seed.jpg".to_string(),
            },
        )
        .await
        .expect("failed to seed post")
}

/// HS256 token matching what the auth provider would issue.
pub fn mint_token(email: &str, name: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: format!("ext-{}", email),
        exp: now + 3600,
        iat: now,
        email: Some(email.to_string()),
        name: Some(name.to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_ref()),
    )
    .expect("failed to mint token")
}
