use serde::{Deserialize, Serialize};

/// Result of a stored upload; `url` is what clients put into posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaUpload {
    pub url: String,
    pub filename: String,
    pub size: u64,
    pub width: u32,
    pub height: u32,
}
