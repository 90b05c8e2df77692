pub mod auth;
pub mod error;
mod professors;
mod reviews;

pub use error::ApiError;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Session routes: login and update issue the cookie, /user reads it back
    let auth_routes = Router::new()
        .route("/user/login", post(auth::login))
        .route("/user/update", post(auth::update_profile))
        .route("/user", get(auth::current_user));

    // Read-only directory routes
    let directory_routes = Router::new()
        .route("/professors", get(professors::list_professors))
        .route("/professors/:name", get(professors::professor_ratings))
        // A bare /reviews has no name segment to look up
        .route("/reviews", get(reviews::missing_professor))
        .route("/reviews/:professorName", get(reviews::reviews_by_professor));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api", directory_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
