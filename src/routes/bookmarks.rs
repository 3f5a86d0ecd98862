use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, Result},
    models::post::FeedQuery,
    state::AppState,
    utils::middleware::OptionalAuth,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_bookmarks))
        .route("/post/:post_id", get(bookmark_status).post(toggle_bookmark))
}

async fn list_bookmarks(
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

    let posts = state
        .bookmark_service
        .list_bookmarked(&user.id, page, limit)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": posts
    })))
}

async fn toggle_bookmark(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Path(post_id): Path<String>,
) -> Result<Json<Value>> {
    let user = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let status = state.bookmark_service.toggle(&user.id, &post_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": status
    })))
}

async fn bookmark_status(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Path(post_id): Path<String>,
) -> Result<Json<Value>> {
    let user = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let status = state.bookmark_service.status(&user.id, &post_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": status
    })))
}
