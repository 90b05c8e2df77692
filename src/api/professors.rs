//! Professor directory routes.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::api::ApiError;
use crate::db::{ProfessorName, RatingRow};
use crate::AppState;

/// List distinct professor names present in the aggregate table.
///
/// GET /api/professors
///
/// Returns the raw row set as `[{"Name": "..."}]`; no pagination or
/// ordering contract beyond whatever the store returns.
pub async fn list_professors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProfessorName>>, ApiError> {
    let rows: Vec<ProfessorName> = sqlx::query_as("SELECT DISTINCT name FROM results")
        .fetch_all(&state.db)
        .await?;

    debug!(count = rows.len(), "Professor directory fetched");
    Ok(Json(rows))
}

/// All aggregate rows for one professor, string fields verbatim.
///
/// GET /api/professors/:name
pub async fn professor_ratings(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<RatingRow>>, ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::bad_request("Professor name is required"));
    }

    let rows: Vec<RatingRow> = sqlx::query_as("SELECT * FROM results WHERE name = ?")
        .bind(&name)
        .fetch_all(&state.db)
        .await?;

    debug!(professor = %name, count = rows.len(), "Aggregate rows fetched");
    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ErrorCode;
    use crate::config::Config;

    async fn test_state() -> Arc<AppState> {
        let db = crate::db::init_test().await;
        Arc::new(AppState::new(Config::default(), db))
    }

    async fn insert_result(state: &AppState, name: &str, term: &str, course: &str) {
        sqlx::query(
            "INSERT INTO results (name, subject_name, term, course_num, entries, \
             avg_response1, avg_response2, avg_response3, overall_rating) \
             VALUES (?, 'Computer Science', ?, ?, '10', '4.0', '4.1', '4.2', '4.5')",
        )
        .bind(name)
        .bind(term)
        .bind(course)
        .execute(&state.db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_list_professors_distinct() {
        let state = test_state().await;
        insert_result(&state, "Turing", "Fall 2022", "1301").await;
        insert_result(&state, "Turing", "Spring 2023", "1301").await;
        insert_result(&state, "Hopper", "Fall 2022", "2350").await;

        let Json(rows) = list_professors(State(state)).await.unwrap();
        let mut names: Vec<String> = rows.into_iter().map(|r| r.name).collect();
        names.sort();
        assert_eq!(names, vec!["Hopper".to_string(), "Turing".to_string()]);
    }

    #[tokio::test]
    async fn test_professor_ratings_exact_match_only() {
        let state = test_state().await;
        insert_result(&state, "Turing", "Fall 2022", "1301").await;
        insert_result(&state, "Hopper", "Fall 2022", "2350").await;

        let Json(rows) = professor_ratings(State(state.clone()), Path("Turing".to_string()))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Turing");
        assert_eq!(rows[0].overall_rating, "4.5");

        // Zero matches is an empty array, not a 404
        let Json(rows) = professor_ratings(State(state), Path("Nobody".to_string()))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_professor_ratings_blank_name_is_bad_request() {
        let state = test_state().await;
        let result = professor_ratings(State(state), Path("  ".to_string())).await;
        assert_eq!(result.unwrap_err().code(), ErrorCode::BadRequest);
    }
}
