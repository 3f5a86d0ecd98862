use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, Result},
    models::user::*,
    services::{auth::Identity, Database},
};

#[derive(Clone)]
pub struct UserService {
    db: Arc<Database>,
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: String,
    user_id: String,
    bio: Option<String>,
    avatar_url: Option<String>,
    location: Option<String>,
    interests: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            user_id: row.user_id,
            bio: row.bio,
            avatar_url: row.avatar_url,
            location: row.location,
            interests: serde_json::from_str(&row.interests).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl UserService {
    pub async fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self { db })
    }

    /// Map a provider identity onto the local users table, creating the row
    /// on first sight. Keyed by email; the insert races safely against a
    /// concurrent first request thanks to the unique email column.
    pub async fn resolve_user(&self, identity: &Identity) -> Result<User> {
        if let Some(user) = self.find_by_email(&identity.email).await? {
            return Ok(user);
        }

        debug!("Creating local user for {}", identity.email);
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, image, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ON CONFLICT(email) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&identity.name)
        .bind(&identity.email)
        .bind(&identity.image)
        .bind(now)
        .execute(self.db.pool())
        .await?;

        self.find_by_email(&identity.email)
            .await?
            .ok_or_else(|| AppError::internal("Failed to create user"))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?1")
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    pub async fn get_profile_view(&self, user_id: &str) -> Result<UserProfileView> {
        let user = self.get_user(user_id).await?;
        let profile = self.get_profile(user_id).await?;
        let stats = self.get_stats(user_id).await?;

        Ok(UserProfileView {
            user,
            profile,
            stats,
        })
    }

    pub async fn get_public_view(&self, user_id: &str) -> Result<PublicUserView> {
        let user = self.get_user(user_id).await?;
        let profile = self.get_profile(user_id).await?;
        let stats = self.get_stats(user_id).await?;

        Ok(PublicUserView {
            id: user.id,
            name: user.name,
            image: user.image,
            profile,
            stats,
        })
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = ?1")
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.map(Profile::from))
    }

    /// Update the display name and upsert the profile row in one
    /// transaction, so a partial write can never leave name and bio from
    /// different requests.
    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<UserProfileView> {
        request.validate().map_err(AppError::ValidatorError)?;

        // Ensure the user exists before writing anything
        self.get_user(user_id).await?;

        let now = Utc::now();
        let interests_json =
            serde_json::to_string(&request.interests.clone().unwrap_or_default())?;

        let mut tx = self.db.pool().begin().await?;

        if let Some(name) = &request.name {
            sqlx::query("UPDATE users SET name = ?1, updated_at = ?2 WHERE id = ?3")
                .bind(name)
                .bind(now)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO profiles (id, user_id, bio, avatar_url, location, interests, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            ON CONFLICT(user_id) DO UPDATE SET
                bio = excluded.bio,
                avatar_url = excluded.avatar_url,
                location = excluded.location,
                interests = excluded.interests,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(&request.bio)
        .bind(&request.avatar_url)
        .bind(&request.location)
        .bind(&interests_json)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Profile updated for user {}", user_id);
        self.get_profile_view(user_id).await
    }

    pub async fn get_stats(&self, user_id: &str) -> Result<UserStats> {
        let posts =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE user_id = ?1")
                .bind(user_id)
                .fetch_one(self.db.pool())
                .await?;
        let followers =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE following_id = ?1")
                .bind(user_id)
                .fetch_one(self.db.pool())
                .await?;
        let following =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE follower_id = ?1")
                .bind(user_id)
                .fetch_one(self.db.pool())
                .await?;

        Ok(UserStats {
            posts,
            followers,
            following,
        })
    }
}
