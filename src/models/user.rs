use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Local user row. Identity itself lives with the auth provider; this row is
/// resolved (or created) by email on each authenticated request.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One-to-one profile attached to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
    pub interests: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,

    #[validate(length(max = 160))]
    pub bio: Option<String>,

    #[validate(url)]
    pub avatar_url: Option<String>,

    #[validate(length(max = 100))]
    pub location: Option<String>,

    pub interests: Option<Vec<String>>,
}

/// Aggregate-counted per-user stats. Never stored, always recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub posts: i64,
    pub followers: i64,
    pub following: i64,
}

/// Full view of the requesting user's own account.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserProfileView {
    #[serde(flatten)]
    pub user: User,
    pub profile: Option<Profile>,
    pub stats: UserStats,
}

/// Public view of another user. No email.
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicUserView {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub profile: Option<Profile>,
    pub stats: UserStats,
}
