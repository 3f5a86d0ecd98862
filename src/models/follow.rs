use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Follow {
    pub id: String,
    pub follower_id: String,
    pub following_id: String,
    pub created_at: DateTime<Utc>,
}

/// Entry in a followers/following listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FollowUser {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub followed_at: DateTime<Utc>,
}
