use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub image_url: String,
    pub caption: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Gallery row; display_order 0 is the cover image.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostImage {
    pub id: String,
    pub post_id: String,
    pub image_url: String,
    pub display_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(max = 2200))]
    pub caption: Option<String>,

    pub tags: Vec<String>,

    /// Public URL of the already-stored image. A post without an image is
    /// rejected.
    #[validate(length(min = 1, message = "An image is required"))]
    pub image_url: String,
}

/// Post as rendered into a feed: author info, aggregate counts and the
/// viewer's own like/bookmark state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFeedItem {
    #[serde(flatten)]
    pub post: Post,
    pub author_name: Option<String>,
    pub author_image: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked: bool,
    pub bookmarked: bool,
}

/// Flat row shape produced by the feed queries (posts, user posts,
/// bookmarked posts). Tags come back as their JSON text column.
#[derive(Debug, FromRow)]
pub struct PostFeedRow {
    pub id: String,
    pub user_id: String,
    pub image_url: String,
    pub caption: Option<String>,
    pub tags: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: Option<String>,
    pub author_image: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked: bool,
    pub bookmarked: bool,
}

impl From<PostFeedRow> for PostFeedItem {
    fn from(row: PostFeedRow) -> Self {
        let tags = serde_json::from_str(&row.tags).unwrap_or_default();
        PostFeedItem {
            post: Post {
                id: row.id,
                user_id: row.user_id,
                image_url: row.image_url,
                caption: row.caption,
                tags,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            author_name: row.author_name,
            author_image: row.author_image,
            like_count: row.like_count,
            comment_count: row.comment_count,
            liked: row.liked,
            bookmarked: row.bookmarked,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
