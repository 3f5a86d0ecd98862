use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::like::LikeStatus,
    services::Database,
};

/// Likes are toggle relationships: the join row's existence is the state.
/// The composite UNIQUE(user_id, post_id) index plus `ON CONFLICT DO
/// NOTHING` keeps concurrent toggles from ever producing a second row or a
/// constraint error.
#[derive(Clone)]
pub struct LikeService {
    db: Arc<Database>,
}

impl LikeService {
    pub async fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self { db })
    }

    pub async fn toggle(&self, user_id: &str, post_id: &str) -> Result<LikeStatus> {
        debug!("Toggling like on post {} by user {}", post_id, user_id);
        self.ensure_post_exists(post_id).await?;

        let mut tx = self.db.pool().begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO likes (id, user_id, post_id, created_at)
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

        let liked = if inserted == 0 {
            sqlx::query("DELETE FROM likes WHERE user_id = ?1 AND post_id = ?2")
                .bind(user_id)
                .bind(post_id)
                .execute(&mut *tx)
                .await?;
            false
        } else {
            true
        };

        tx.commit().await?;

        // Always a fresh aggregate, never an incremented counter
        let like_count = self.count(post_id).await?;
        Ok(LikeStatus { liked, like_count })
    }

    pub async fn status(&self, user_id: &str, post_id: &str) -> Result<LikeStatus> {
        self.ensure_post_exists(post_id).await?;

        let liked = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = ?1 AND post_id = ?2)",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(self.db.pool())
        .await?;

        let like_count = self.count(post_id).await?;

        Ok(LikeStatus {
            liked: liked != 0,
            like_count,
        })
    }

    pub async fn count(&self, post_id: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = ?1")
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
