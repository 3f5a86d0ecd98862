use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Join row whose presence alone encodes "liked". At most one row exists per
/// (user, post) pair, enforced by a composite unique index.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Like {
    pub id: String,
    pub user_id: String,
    pub post_id: String,
    pub created_at: DateTime<Utc>,
}

/// Toggle / status response. The count is always a fresh aggregate, never a
/// stored counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeStatus {
    pub liked: bool,
    pub like_count: i64,
}
