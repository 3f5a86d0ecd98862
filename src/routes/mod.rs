pub mod bookmarks;
pub mod comments;
pub mod follows;
pub mod media;
pub mod posts;
pub mod search;
pub mod users;
