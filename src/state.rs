use crate::{
    config::Config,
    services::{
        auth::AuthService, bookmark::BookmarkService, comment::CommentService,
        database::Database, follow::FollowService, like::LikeService, media::MediaService,
        post::PostService, search::SearchService, user::UserService,
    },
};

/// Shared application state: configuration plus one service per domain area.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub post_service: PostService,
    pub like_service: LikeService,
    pub bookmark_service: BookmarkService,
    pub comment_service: CommentService,
    pub follow_service: FollowService,
    pub search_service: SearchService,
    pub media_service: MediaService,
}

impl AppState {
    pub fn page_size(&self, resource_type: &str) -> usize {
        match resource_type {
            "posts" => self.config.default_posts_per_page,
            "comments" => self.config.default_comments_per_page,
            _ => 20,
        }
    }

    pub fn is_production(&self) -> bool {
        self.config.is_production()
    }

    pub fn is_development(&self) -> bool {
        self.config.is_development()
    }
}
