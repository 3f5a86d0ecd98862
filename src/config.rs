use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    pub log_level: String,

    // Database configuration
    pub database_url: String,
    pub database_max_connections: u32,

    // Authentication configuration
    pub auth_service_url: String,
    pub jwt_secret: String,

    // Upload storage configuration
    pub upload_dir: String,
    pub public_base_url: String,
    pub max_upload_size: u64,
    pub allowed_image_types: String,

    // Content settings
    pub max_caption_length: usize,
    pub max_comment_length: usize,
    pub max_bio_length: usize,
    pub default_posts_per_page: usize,
    pub default_comments_per_page: usize,

    // Search configuration
    pub search_min_length: usize,
    pub search_max_results: usize,

    // Rate limiting
    pub rate_limit_requests: u32,

    // CORS configuration
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/snapfeed.db".to_string()),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,

            auth_service_url: env::var("AUTH_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),

            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "data/uploads".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .unwrap_or_else(|_| "10485760".to_string())
                .parse()?,
            allowed_image_types: env::var("ALLOWED_IMAGE_TYPES")
                .unwrap_or_else(|_| "jpeg,jpg,png,gif,webp".to_string()),

            max_caption_length: env::var("MAX_CAPTION_LENGTH")
                .unwrap_or_else(|_| "2200".to_string())
                .parse()?,
            max_comment_length: env::var("MAX_COMMENT_LENGTH")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()?,
            max_bio_length: env::var("MAX_BIO_LENGTH")
                .unwrap_or_else(|_| "160".to_string())
                .parse()?,
            default_posts_per_page: env::var("DEFAULT_POSTS_PER_PAGE")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,
            default_comments_per_page: env::var("DEFAULT_COMMENTS_PER_PAGE")
                .unwrap_or_else(|_| "50".to_string())
                .parse()?,

            search_min_length: env::var("SEARCH_MIN_LENGTH")
                .unwrap_or_else(|_| "2".to_string())
                .parse()?,
            search_max_results: env::var("SEARCH_MAX_RESULTS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()?,

            rate_limit_requests: env::var("RATE_LIMIT_REQUESTS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()?,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
