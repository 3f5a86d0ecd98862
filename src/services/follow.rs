use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::follow::FollowUser,
    services::Database,
};

#[derive(Clone)]
pub struct FollowService {
    db: Arc<Database>,
}

impl FollowService {
    pub async fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self { db })
    }

    pub async fn follow(&self, follower_id: &str, following_id: &str) -> Result<()> {
        if follower_id == following_id {
            return Err(AppError::bad_request("You cannot follow yourself"));
        }
        self.ensure_user_exists(following_id).await?;

        debug!("User {} follows {}", follower_id, following_id);
        let inserted = sqlx::query(
            r#"
            INSERT INTO follows (id, follower_id, following_id, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(follower_id, following_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(follower_id)
        .bind(following_id)
        .bind(Utc::now())
        .execute(self.db.pool())
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(AppError::conflict("Already following this user"));
        }

        Ok(())
    }

    pub async fn unfollow(&self, follower_id: &str, following_id: &str) -> Result<()> {
        let deleted =
            sqlx::query("DELETE FROM follows WHERE follower_id = ?1 AND following_id = ?2")
                .bind(follower_id)
                .bind(following_id)
                .execute(self.db.pool())
                .await?
                .rows_affected();

        if deleted == 0 {
            return Err(AppError::not_found("Follow"));
        }

        Ok(())
    }

    pub async fn is_following(&self, follower_id: &str, following_id: &str) -> Result<bool> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = ?1 AND following_id = ?2)",
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(self.db.pool())
        .await?;
        Ok(found != 0)
    }

    pub async fn followers(&self, user_id: &str) -> Result<Vec<FollowUser>> {
        let users = sqlx::query_as::<_, FollowUser>(
            r#"
            SELECT u.id, u.name, u.image, f.created_at AS followed_at
            FROM follows f
            JOIN users u ON u.id = f.follower_id
            WHERE f.following_id = ?1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(users)
    }

    pub async fn following(&self, user_id: &str) -> Result<Vec<FollowUser>> {
        let users = sqlx::query_as::<_, FollowUser>(
            r#"
            SELECT u.id, u.name, u.image, f.created_at AS followed_at
            FROM follows f
            JOIN users u ON u.id = f.following_id
            WHERE f.follower_id = ?1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(users)
    }

    async fn ensure_user_exists(&self, user_id: &str) -> Result<()> {
        let found =
            sqlx::query_scalar::<_, i64>("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)")
                .bind(user_id)
                .fetch_one(self.db.pool())
                .await?;
        if found == 0 {
            return Err(AppError::not_found("User"));
        }
        Ok(())
    }
}
