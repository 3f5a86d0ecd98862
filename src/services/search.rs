use std::sync::Arc;

use tracing::debug;

use crate::{
    config::Config,
    error::Result,
    models::{post::*, search::*},
    services::Database,
};

/// Substring search over posts (caption or tags) and users (name or email).
/// Plain SQL LIKE; the tags column is JSON text, so a tag match is a
/// substring match against that text.
#[derive(Clone)]
pub struct SearchService {
    db: Arc<Database>,
    min_length: usize,
    max_results: usize,
}

impl SearchService {
    pub async fn new(db: Arc<Database>, config: &Config) -> Result<Self> {
        Ok(Self {
            db,
            min_length: config.search_min_length,
            max_results: config.search_max_results,
        })
    }

    pub async fn search(&self, viewer_id: &str, query: SearchQuery) -> Result<SearchResults> {
        let term = query.q.trim();
        debug!("Searching for: {}", term);

        let mut results = SearchResults {
            posts: vec![],
            users: vec![],
            total_results: 0,
        };

        if term.len() < self.min_length {
            return Ok(results);
        }

        let limit = query
            .limit
            .unwrap_or(10)
            .clamp(1, self.max_results as i64);
        let search_type = query.search_type.unwrap_or(SearchType::All);

        match search_type {
            SearchType::All => {
                results.posts = self.search_posts(viewer_id, term, 5).await?;
                results.users = self.search_users(term, 5).await?;
            }
            SearchType::Posts => {
                results.posts = self.search_posts(viewer_id, term, limit).await?;
            }
            SearchType::Users => {
                results.users = self.search_users(term, limit).await?;
            }
        }

        results.total_results = (results.posts.len() + results.users.len()) as i64;
        Ok(results)
    }

    async fn search_posts(
        &self,
        viewer_id: &str,
        term: &str,
        limit: i64,
    ) -> Result<Vec<PostFeedItem>> {
        let rows = sqlx::query_as::<_, PostFeedRow>(
            r#"
            SELECT
                p.id, p.user_id, p.image_url, p.caption, p.tags, p.created_at, p.updated_at,
                u.name AS author_name, u.image AS author_image,
                (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
                (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count,
                EXISTS(SELECT 1 FROM likes l WHERE l.post_id = p.id AND l.user_id = ?1) AS liked,
                EXISTS(SELECT 1 FROM bookmarks b WHERE b.post_id = p.id AND b.user_id = ?1) AS bookmarked
            FROM posts p
            JOIN users u ON u.id = p.user_id
            WHERE p.caption LIKE '%' || ?2 || '%' OR p.tags LIKE '%' || ?2 || '%'
            ORDER BY p.created_at DESC
            LIMIT ?3
            "#,
        )
        .bind(viewer_id)
        .bind(term)
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(PostFeedItem::from).collect())
    }

    async fn search_users(&self, term: &str, limit: i64) -> Result<Vec<UserSearchResult>> {
        let users = sqlx::query_as::<_, UserSearchResult>(
            r#"
            SELECT u.id, u.name, u.image, pr.bio
            FROM users u
            LEFT JOIN profiles pr ON pr.user_id = u.id
            WHERE u.name LIKE '%' || ?1 || '%' OR u.email LIKE '%' || ?1 || '%'
            ORDER BY u.name
            LIMIT ?2
            "#,
        )
        .bind(term)
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok(users)
    }
}
