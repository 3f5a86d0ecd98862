use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, Result},
    models::search::SearchQuery,
    state::AppState,
    utils::middleware::OptionalAuth,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(search))
}

async fn search(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>> {
    let user = user.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let results = state.search_service.search(&user.id, query).await?;

    Ok(Json(json!({
        "success": true,
        "data": results
    })))
}
