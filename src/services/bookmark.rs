use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{bookmark::BookmarkStatus, post::*},
    services::Database,
};

/// Same toggle contract as likes: unique join row, existence is the state.
#[derive(Clone)]
pub struct BookmarkService {
    db: Arc<Database>,
}

impl BookmarkService {
    pub async fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self { db })
    }

    pub async fn toggle(&self, user_id: &str, post_id: &str) -> Result<BookmarkStatus> {
        debug!("Toggling bookmark on post {} by user {}", post_id, user_id);
        self.ensure_post_exists(post_id).await?;

        let mut tx = self.db.pool().begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO bookmarks (id, user_id, post_id, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id, post_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(post_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let bookmarked = if inserted == 0 {
            sqlx::query("DELETE FROM bookmarks WHERE user_id = ?1 AND post_id = ?2")
                .bind(user_id)
                .bind(post_id)
                .execute(&mut *tx)
                .await?;
            false
        } else {
            true
        };

        tx.commit().await?;

        let bookmark_count = self.count(post_id).await?;
        Ok(BookmarkStatus {
            bookmarked,
            bookmark_count,
        })
    }

    pub async fn status(&self, user_id: &str, post_id: &str) -> Result<BookmarkStatus> {
        self.ensure_post_exists(post_id).await?;

        let bookmarked = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM bookmarks WHERE user_id = ?1 AND post_id = ?2)",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(self.db.pool())
        .await?;

        let bookmark_count = self.count(post_id).await?;

        Ok(BookmarkStatus {
            bookmarked: bookmarked != 0,
            bookmark_count,
        })
    }

    /// The viewer's bookmarked posts, newest bookmark first, rendered the
    /// same way as the feed.
    pub async fn list_bookmarked(
        &self,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<Vec<PostFeedItem>> {
        let offset = (page.max(1) - 1) * limit;

        let rows = sqlx::query_as::<_, PostFeedRow>(
            r#"
            SELECT
                p.id, p.user_id, p.image_url, p.caption, p.tags, p.created_at, p.updated_at,
                u.name AS author_name, u.image AS author_image,
                (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
                (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count,
                EXISTS(SELECT 1 FROM likes l WHERE l.post_id = p.id AND l.user_id = ?1) AS liked,
                1 AS bookmarked
            FROM bookmarks b
            JOIN posts p ON p.id = b.post_id
            JOIN users u ON u.id = p.user_id
            WHERE b.user_id = ?1
            ORDER BY b.created_at DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(PostFeedItem::from).collect())
    }

    pub async fn count(&self, post_id: &str) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookmarks WHERE post_id = ?1")
                .bind(post_id)
                .fetch_one(self.db.pool())
                .await?;
        Ok(count)
    }

    async fn ensure_post_exists(&self, post_id: &str) -> Result<()> {
        let found =
            sqlx::query_scalar::<_, i64>("SELECT EXISTS(SELECT 1 FROM posts WHERE id = ?1)")
                .bind(post_id)
                .fetch_one(self.db.pool())
                .await?;
        if found == 0 {
            return Err(AppError::not_found("Post"));
        }
        Ok(())
    }
}
