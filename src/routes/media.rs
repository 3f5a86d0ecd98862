use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::Json,
    routing::post,
    Router,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, Result},
    state::AppState,
    utils::middleware::OptionalAuth,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(upload))
}

/// Store an uploaded image and return its public URL.
async fn upload(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    mut multipart: Multipart,
) -> Result<Json<Value>> {
    let _ = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(&format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|n| n.to_string())
            .ok_or_else(|| AppError::bad_request("File field is missing a filename"))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(&format!("Failed to read file: {}", e)))?;

        let upload = state.media_service.store(&filename, &data).await?;

        return Ok(Json(json!({
            "success": true,
            "data": upload
        })));
    }

    Err(AppError::bad_request("No file field in upload"))
}
