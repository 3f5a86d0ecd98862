use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, Result},
    state::AppState,
    utils::middleware::OptionalAuth,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/:user_id", post(follow_user).delete(unfollow_user))
        .route("/followers/:user_id", get(list_followers))
        .route("/following/:user_id", get(list_following))
}

async fn follow_user(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Path(user_id): Path<String>,
) -> Result<Json<Value>> {
    let user = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    state.follow_service.follow(&user.id, &user_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Followed successfully"
    })))
}

async fn unfollow_user(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Path(user_id): Path<String>,
) -> Result<Json<Value>> {
    let user = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    state.follow_service.unfollow(&user.id, &user_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Unfollowed successfully"
    })))
}

async fn list_followers(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Path(user_id): Path<String>,
) -> Result<Json<Value>> {
    let _ = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let followers = state.follow_service.followers(&user_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": followers
    })))
}

async fn list_following(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Path(user_id): Path<String>,
) -> Result<Json<Value>> {
    let _ = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let following = state.follow_service.following(&user_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": following
    })))
}
