// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Registration, login and logout routes.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::User;
use crate::services::Registration;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64))]
    username: String,
    #[validate(email)]
    email: String,
    password: String,
    confirm_password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

/// Issued session, also set as the `study_token` cookie.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub username: String,
    pub token: String,
}

/// Create an account and sign it in.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>)> {
    body.validate()?;

    let user = state
        .accounts
        .register(Registration {
            username: body.username,
            email: body.email,
            password: body.password,
            confirm_password: body.confirm_password,
        })
        .await?;

    let (jar, session) = start_session(&state, jar, user)?;
    Ok((StatusCode::CREATED, jar, Json(session)))
}

/// Exchange username and password for a session token.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let user = state.accounts.login(&body.username, &body.password).await?;
    let (jar, session) = start_session(&state, jar, user)?;
    Ok((jar, Json(session)))
}

/// Clear the session cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (StatusCode, CookieJar) {
    let removal = Cookie::build(SESSION_COOKIE)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(uses_https(&state));
    (StatusCode::NO_CONTENT, jar.remove(removal))
}

fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: User,
) -> Result<(CookieJar, SessionResponse)> {
    let ttl_days = state.config.session_ttl_days;
    let token = create_jwt(user.id, &state.config.jwt_signing_key, ttl_days)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let max_age = ttl_days
        .checked_mul(24 * 60 * 60)
        .and_then(|secs| i64::try_from(secs).ok())
        .map(time::Duration::seconds)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Session TTL out of range")))?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(uses_https(state))
        .max_age(max_age);

    Ok((
        jar.add(cookie),
        SessionResponse {
            user_id: user.id,
            username: user.username,
            token,
        },
    ))
}

fn uses_https(state: &AppState) -> bool {
    state.config.frontend_url.starts_with("https://")
}
