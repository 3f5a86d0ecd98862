use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, Result},
    models::post::{CreatePostRequest, FeedQuery},
    state::AppState,
    utils::{middleware::OptionalAuth, validation::parse_list},
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post).delete(delete_post))
        .route("/:id/like", get(like_status).post(toggle_like))
}

async fn list_posts(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Value>> {
    let user = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(state.page_size("posts") as i64)
        .clamp(1, 100);

    let posts = state.post_service.feed(&user.id, page, limit).await?;

    Ok(Json(json!({
        "success": true,
        "data": posts
    })))
}

/// Multipart creation: `image` (required file), `caption`, comma-separated
/// `tags`. The image is stored first; the post references its public URL.
async fn create_post(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    mut multipart: Multipart,
) -> Result<Json<Value>> {
    let user = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let mut caption: Option<String> = None;
    let mut tags: Vec<String> = Vec::new();
    let mut image_url = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(&format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("image") => {
                let filename = field
                    .file_name()
                    .map(|n| n.to_string())
                    .ok_or_else(|| AppError::bad_request("Image field is missing a filename"))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::bad_request(&format!("Failed to read image: {}", e)))?;
                let upload = state.media_service.store(&filename, &data).await?;
                image_url = upload.url;
            }
            Some("caption") => {
                caption = Some(field.text().await.map_err(|e| {
                    AppError::bad_request(&format!("Failed to read caption: {}", e))
                })?);
            }
            Some("tags") => {
                let raw = field.text().await.map_err(|e| {
                    AppError::bad_request(&format!("Failed to read tags: {}", e))
                })?;
                tags = parse_list(&raw);
            }
            _ => {}
        }
    }

    let request = CreatePostRequest {
        caption,
        tags,
        image_url,
    };
    let created = state.post_service.create_post(&user.id, request).await?;

    Ok(Json(json!({
        "success": true,
        "data": created
    })))
}

async fn get_post(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Path(post_id): Path<String>,
) -> Result<Json<Value>> {
    let user = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let post = state.post_service.get_post(&post_id, &user.id).await?;
    let comments = state
        .comment_service
        .list_for_post(&post_id, state.page_size("comments") as i64)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "post": post,
            "comments": comments
        }
    })))
}

async fn delete_post(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Path(post_id): Path<String>,
) -> Result<Json<Value>> {
    let user = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    state.post_service.delete_post(&post_id, &user.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Post deleted successfully"
    })))
}

async fn toggle_like(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Path(post_id): Path<String>,
) -> Result<Json<Value>> {
    let user = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let status = state.like_service.toggle(&user.id, &post_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": status
    })))
}

async fn like_status(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Path(post_id): Path<String>,
) -> Result<Json<Value>> {
    let user = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let status = state.like_service.status(&user.id, &post_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": status
    })))
}
