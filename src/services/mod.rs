pub mod auth;
pub mod bookmark;
pub mod comment;
pub mod database;
pub mod follow;
pub mod like;
pub mod media;
pub mod post;
pub mod search;
pub mod user;

pub use auth::AuthService;
pub use bookmark::BookmarkService;
pub use comment::CommentService;
pub use database::Database;
pub use follow::FollowService;
pub use like::LikeService;
pub use media::MediaService;
pub use post::PostService;
pub use search::SearchService;
pub use user::UserService;
