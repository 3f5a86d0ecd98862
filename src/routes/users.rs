use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, Result},
    models::user::UpdateProfileRequest,
    state::AppState,
    utils::middleware::OptionalAuth,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/profile", put(update_profile))
        .route("/:id", get(get_user))
}

/// The requesting user's own account: profile, posts and aggregate stats.
async fn get_me(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<Value>> {
    let user = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let view = state.user_service.get_profile_view(&user.id).await?;
    let posts = state.post_service.list_by_user(&user.id, &user.id).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "user": view,
            "posts": posts
        }
    })))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Value>> {
    let user = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let view = state.user_service.update_profile(&user.id, request).await?;

    Ok(Json(json!({
        "success": true,
        "data": view
    })))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Path(user_id): Path<String>,
) -> Result<Json<Value>> {
    let viewer = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let view = state.user_service.get_public_view(&user_id).await?;
    let posts = state.post_service.list_by_user(&user_id, &viewer.id).await?;
    let is_following = state.follow_service.is_following(&viewer.id, &user_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "user": view,
            "posts": posts,
            "is_following": is_following
        }
    })))
}
