use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, Result},
    models::comment::*,
    services::Database,
};

#[derive(Clone)]
pub struct CommentService {
    db: Arc<Database>,
}

impl CommentService {
    pub async fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self { db })
    }

    pub async fn create_comment(
        &self,
        user_id: &str,
        request: CreateCommentRequest,
    ) -> Result<Comment> {
        debug!("Creating comment on post {}", request.post_id);
        request.validate().map_err(AppError::ValidatorError)?;

        let post_exists =
            sqlx::query_scalar::<_, i64>("SELECT EXISTS(SELECT 1 FROM posts WHERE id = ?1)")
                .bind(&request.post_id)
                .fetch_one(self.db.pool())
                .await?;
        if post_exists == 0 {
            return Err(AppError::not_found("Post"));
        }

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            post_id: request.post_id,
            user_id: user_id.to_string(),
            content: request.content,
            edited: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, user_id, content, edited, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&comment.id)
        .bind(&comment.post_id)
        .bind(&comment.user_id)
        .bind(&comment.content)
        .bind(comment.edited)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(self.db.pool())
        .await?;

        Ok(comment)
    }

    pub async fn get_comment(&self, comment_id: &str) -> Result<Comment> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?1")
            .bind(comment_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| AppError::not_found("Comment"))
    }

    pub async fn list_for_post(&self, post_id: &str, limit: i64) -> Result<Vec<CommentWithAuthor>> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.post_id, c.user_id, c.content, c.edited, c.created_at, c.updated_at,
                   u.name AS author_name, u.image AS author_image
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.post_id = ?1
            ORDER BY c.created_at DESC
            LIMIT ?2
            "#,
        )
        .bind(post_id)
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok(comments)
    }

    /// Author-only edit; replaces the content and marks the comment edited.
    pub async fn update_comment(
        &self,
        comment_id: &str,
        user_id: &str,
        request: UpdateCommentRequest,
    ) -> Result<Comment> {
        request.validate().map_err(AppError::ValidatorError)?;

        let comment = self.get_comment(comment_id).await?;
        if comment.user_id != user_id {
            return Err(AppError::forbidden("You can only edit your own comments"));
        }

        let now = Utc::now();
        sqlx::query(
            "UPDATE comments SET content = ?1, edited = 1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(&request.content)
        .bind(now)
        .bind(comment_id)
        .execute(self.db.pool())
        .await?;

        Ok(Comment {
            content: request.content,
            edited: true,
            updated_at: now,
            ..comment
        })
    }

    /// Author-only hard delete.
    pub async fn delete_comment(&self, comment_id: &str, user_id: &str) -> Result<()> {
        let comment = self.get_comment(comment_id).await?;
        if comment.user_id != user_id {
            return Err(AppError::forbidden("You can only delete your own comments"));
        }

        sqlx::query("DELETE FROM comments WHERE id = ?1")
            .bind(comment_id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }
}
