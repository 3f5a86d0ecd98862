use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, Result},
    models::post::*,
    services::Database,
};

/// Columns shared by every feed query. Counts and viewer flags are computed
/// per request by aggregate subqueries; nothing here reads a stored counter.
const FEED_COLUMNS: &str = r#"
    p.id, p.user_id, p.image_url, p.caption, p.tags, p.created_at, p.updated_at,
    u.name AS author_name, u.image AS author_image,
    (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count,
    EXISTS(SELECT 1 FROM likes l WHERE l.post_id = p.id AND l.user_id = ?1) AS liked,
    EXISTS(SELECT 1 FROM bookmarks b WHERE b.post_id = p.id AND b.user_id = ?1) AS bookmarked
"#;

#[derive(Clone)]
pub struct PostService {
    db: Arc<Database>,
}

impl PostService {
    pub async fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self { db })
    }

    /// Create a post plus its cover gallery row in one transaction. A post
    /// without an image is rejected by request validation.
    pub async fn create_post(&self, user_id: &str, request: CreatePostRequest) -> Result<Post> {
        request.validate().map_err(AppError::ValidatorError)?;

        let post = Post {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            image_url: request.image_url,
            caption: request.caption.filter(|c| !c.is_empty()),
            tags: request.tags,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let tags_json = serde_json::to_string(&post.tags)?;
        let mut tx = self.db.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO posts (id, user_id, image_url, caption, tags, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&post.id)
        .bind(&post.user_id)
        .bind(&post.image_url)
        .bind(&post.caption)
        .bind(&tags_json)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO post_images (id, post_id, image_url, display_order)
            VALUES (?1, ?2, ?3, 0)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&post.id)
        .bind(&post.image_url)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Post {} created by user {}", post.id, user_id);
        Ok(post)
    }

    /// Newest-first feed with author info, aggregate counts and the viewer's
    /// like/bookmark state.
    pub async fn feed(&self, viewer_id: &str, page: i64, limit: i64) -> Result<Vec<PostFeedItem>> {
        let offset = (page.max(1) - 1) * limit;
        let sql = format!(
            r#"
            SELECT {FEED_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.created_at DESC
            LIMIT ?2 OFFSET ?3
            "#
        );

        let rows = sqlx::query_as::<_, PostFeedRow>(&sql)
            .bind(viewer_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(PostFeedItem::from).collect())
    }

    pub async fn list_by_user(&self, owner_id: &str, viewer_id: &str) -> Result<Vec<PostFeedItem>> {
        let sql = format!(
            r#"
            SELECT {FEED_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.user_id
            WHERE p.user_id = ?2
            ORDER BY p.created_at DESC
            "#
        );

        let rows = sqlx::query_as::<_, PostFeedRow>(&sql)
            .bind(viewer_id)
            .bind(owner_id)
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(PostFeedItem::from).collect())
    }

    pub async fn get_post(&self, post_id: &str, viewer_id: &str) -> Result<PostFeedItem> {
        let sql = format!(
            r#"
            SELECT {FEED_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.user_id
            WHERE p.id = ?2
            "#
        );

        let row = sqlx::query_as::<_, PostFeedRow>(&sql)
            .bind(viewer_id)
            .bind(post_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| AppError::not_found("Post"))?;

        Ok(PostFeedItem::from(row))
    }

    pub async fn exists(&self, post_id: &str) -> Result<bool> {
        let found =
            sqlx::query_scalar::<_, i64>("SELECT EXISTS(SELECT 1 FROM posts WHERE id = ?1)")
                .bind(post_id)
                .fetch_one(self.db.pool())
                .await?;
        Ok(found != 0)
    }

    /// Owner-only hard delete; likes, bookmarks, comments and gallery rows
    /// cascade.
    pub async fn delete_post(&self, post_id: &str, user_id: &str) -> Result<()> {
        debug!("Deleting post {} as user {}", post_id, user_id);

        let owner_id =
            sqlx::query_scalar::<_, String>("SELECT user_id FROM posts WHERE id = ?1")
                .bind(post_id)
                .fetch_optional(self.db.pool())
                .await?
                .ok_or_else(|| AppError::not_found("Post"))?;

        if owner_id != user_id {
            return Err(AppError::forbidden("You can only delete your own posts"));
        }

        sqlx::query("DELETE FROM posts WHERE id = ?1")
            .bind(post_id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }
}
