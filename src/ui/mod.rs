// Server-rendered shell: navbar plus the chat-widget embed. The handler
// pre-fetches the current user from the auth endpoint before rendering,
// the same way the hosted site resolves its navbar state.

mod templates;

use askama::Template;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::auth::{Claims, AUTH_COOKIE};
use crate::AppState;

pub use templates::LayoutTemplate;

// Helper to render templates and handle errors
fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Template error: {}", e),
        )
            .into_response(),
    }
}

pub fn create_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}

/// Resolve the current user by calling our own auth endpoint with the
/// incoming Cookie header forwarded. The base URL comes from the `site`
/// config. Any failure renders the signed-out shell.
async fn fetch_initial_user(state: &AppState, headers: &HeaderMap) -> Option<Claims> {
    let cookie = headers.get(header::COOKIE)?.to_str().ok()?;
    if !cookie.contains(AUTH_COOKIE) {
        debug!("No auth token found in cookies");
        return None;
    }

    let url = format!(
        "{}://{}/api/auth/user",
        state.config.site.protocol, state.config.site.host
    );

    match state
        .http
        .get(&url)
        .header(header::COOKIE, cookie)
        .send()
        .await
    {
        Ok(response) if response.status().is_success() => response.json::<Claims>().await.ok(),
        Ok(response) => {
            debug!(status = %response.status(), "Failed to fetch user");
            None
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch user");
            None
        }
    }
}

async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let user = fetch_initial_user(&state, &headers).await;
    render_template(LayoutTemplate { user })
}
