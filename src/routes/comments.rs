use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, Result},
    models::comment::{CreateCommentRequest, UpdateCommentRequest},
    state::AppState,
    utils::middleware::OptionalAuth,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/post/:post_id", get(get_post_comments))
        .route("/", post(create_comment))
        .route("/:id", put(update_comment).delete(delete_comment))
}

async fn get_post_comments(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Path(post_id): Path<String>,
) -> Result<Json<Value>> {
    let _ = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let comments = state
        .comment_service
        .list_for_post(&post_id, state.page_size("comments") as i64)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": comments
    })))
}

async fn create_comment(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Json(request): Json<CreateCommentRequest>,
) -> Result<Json<Value>> {
    let user = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let comment = state.comment_service.create_comment(&user.id, request).await?;

    Ok(Json(json!({
        "success": true,
        "data": comment
    })))
}

async fn update_comment(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Path(comment_id): Path<String>,
    Json(request): Json<UpdateCommentRequest>,
) -> Result<Json<Value>> {
    let user = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let comment = state
        .comment_service
        .update_comment(&comment_id, &user.id, request)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": comment
    })))
}

async fn delete_comment(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Path(comment_id): Path<String>,
) -> Result<Json<Value>> {
    let user = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    state
        .comment_service
        .delete_comment(&comment_id, &user.id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Comment deleted successfully"
    })))
}
