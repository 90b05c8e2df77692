//! Authentication routes: login, profile update, current-user lookup.
//!
//! Sessions are stateless HS256 tokens carried in an HTTP-only cookie.
//! The token embeds the user's identity claims and nothing else; there is
//! no server-side session table and no revocation. A token stays valid for
//! the cookie lifetime even if the profile it describes changes afterward.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, Json};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::ApiError;
use crate::config::AuthConfig;
use crate::db::{DbPool, User};
use crate::AppState;

/// Session token cookie name
pub const AUTH_COOKIE: &str = "auth_token";

/// Cookie lifetime: 7 days
const COOKIE_MAX_AGE_SECS: i64 = 604_800;

/// Identity claims embedded in the session token. No `exp` claim: the
/// cookie max-age is the only lifetime bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub email: String,
    pub fname: String,
    pub lname: String,
}

impl From<&User> for Claims {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            fname: user.fname.clone(),
            lname: user.lname.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: String,
    #[serde(default)]
    pub fname: Option<String>,
    #[serde(default)]
    pub lname: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Sign a session token from identity claims
pub fn sign_token(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a session token and return its claims, or None if the signature
/// does not check out.
pub fn verify_token(token: &str, secret: &str) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Lifetime is bounded by the cookie, not the token payload.
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .ok()
}

/// Build the session cookie. `secure` is only demanded outside local
/// development.
fn session_cookie(token: String, production: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(COOKIE_MAX_AGE_SECS))
        .secure(production)
        .build()
}

/// Missing or empty optional fields fall back to the stored value.
fn or_stored(incoming: Option<String>, stored: String) -> String {
    match incoming {
        Some(v) if !v.is_empty() => v,
        _ => stored,
    }
}

/// POST /api/auth/user/login
///
/// Body: `{email, password}`. 404 when no user matches the email, 401 on a
/// password mismatch, otherwise 200 with a fresh session cookie.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&request.email)
        .fetch_optional(&state.db)
        .await?;

    let user = user.ok_or_else(|| ApiError::not_found("User not found"))?;

    if !verify_password(&request.password, &user.password_hash) {
        warn!(email = %user.email, "Login rejected: password mismatch");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = sign_token(&Claims::from(&user), &state.config.auth.jwt_secret)?;
    let jar = jar.add(session_cookie(token, state.config.site.production));

    info!(user_id = user.id, email = %user.email, "User logged in");

    Ok((jar, Json(serde_json::json!({ "message": "Login successful" }))))
}

/// POST /api/auth/user/update
///
/// Body: `{email, fname?, lname?, password?}`. The lookup keys on the
/// incoming email, so the route cannot rename an address it does not
/// already know. Empty optional fields keep the stored values; an absent
/// password keeps the stored hash byte for byte. Success re-issues the
/// session cookie from the updated record.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&request.email)
        .fetch_optional(&state.db)
        .await?;

    let user = user.ok_or_else(|| ApiError::not_found("User not found"))?;

    let email = if request.email.is_empty() {
        user.email.clone()
    } else {
        request.email.clone()
    };
    let fname = or_stored(request.fname, user.fname);
    let lname = or_stored(request.lname, user.lname);
    let password_hash = match request.password {
        Some(p) if !p.is_empty() => hash_password(&p).map_err(|e| {
            tracing::error!(error = %e, "Failed to hash password");
            ApiError::internal("Internal Server Error")
        })?,
        _ => user.password_hash,
    };

    sqlx::query(
        "UPDATE users SET email = ?, fname = ?, lname = ?, password_hash = ?, \
         updated_at = datetime('now') WHERE id = ?",
    )
    .bind(&email)
    .bind(&fname)
    .bind(&lname)
    .bind(&password_hash)
    .bind(user.id)
    .execute(&state.db)
    .await?;

    let claims = Claims {
        user_id: user.id,
        email,
        fname,
        lname,
    };
    let token = sign_token(&claims, &state.config.auth.jwt_secret)?;
    let jar = jar.add(session_cookie(token, state.config.site.production));

    info!(user_id = user.id, email = %claims.email, "Profile updated");

    Ok((
        jar,
        Json(serde_json::json!({ "message": "Profile updated successfully" })),
    ))
}

/// GET /api/auth/user
///
/// Returns the identity claims carried by the session cookie, or 401 when
/// the cookie is missing or fails verification.
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<Claims>, ApiError> {
    let token = jar
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    let claims = verify_token(&token, &state.config.auth.jwt_secret)
        .ok_or_else(|| ApiError::unauthorized("Invalid token"))?;

    Ok(Json(claims))
}

/// Create the configured seed account when the users table is empty, so a
/// fresh deployment has something to log in with.
pub async fn ensure_seed_user(pool: &DbPool, auth: &AuthConfig) -> anyhow::Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    if count.0 > 0 {
        return Ok(());
    }

    let password_hash = hash_password(&auth.seed_password)
        .map_err(|e| anyhow::anyhow!("Failed to hash seed password: {}", e))?;

    sqlx::query("INSERT INTO users (email, fname, lname, password_hash) VALUES (?, ?, ?, ?)")
        .bind(&auth.seed_email)
        .bind(&auth.seed_fname)
        .bind(&auth.seed_lname)
        .bind(&password_hash)
        .execute(pool)
        .await?;

    info!(email = %auth.seed_email, "Created seed user");
    Ok(())
}
