//! Reviews-by-professor route.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::api::ApiError;
use crate::db::Review;
use crate::AppState;

/// All review rows whose professor name matches exactly. Case and
/// whitespace sensitivity are whatever the store's comparison does.
///
/// GET /api/reviews/:professorName
pub async fn reviews_by_professor(
    State(state): State<Arc<AppState>>,
    Path(professor_name): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    if professor_name.trim().is_empty() {
        return Err(ApiError::bad_request("Professor name is required"));
    }

    let rows: Vec<Review> = sqlx::query_as("SELECT * FROM reviews WHERE prof_name = ?")
        .bind(&professor_name)
        .fetch_all(&state.db)
        .await?;

    debug!(professor = %professor_name, count = rows.len(), "Reviews fetched");
    Ok(Json(rows))
}

/// GET /api/reviews with no name segment.
pub async fn missing_professor() -> ApiError {
    ApiError::bad_request("Professor name is required")
}
