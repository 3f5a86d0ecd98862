use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::post::PostFeedItem;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(rename = "type")]
    pub search_type: Option<SearchType>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    All,
    Posts,
    Users,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResults {
    pub posts: Vec<PostFeedItem>,
    pub users: Vec<UserSearchResult>,
    pub total_results: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSearchResult {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
}
