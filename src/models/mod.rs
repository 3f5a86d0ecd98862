pub mod bookmark;
pub mod comment;
pub mod follow;
pub mod like;
pub mod media;
pub mod post;
pub mod search;
pub mod user;
