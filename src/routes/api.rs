// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! API routes for authenticated users.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Difficulty, Goal, StudySession, Subject, User};
use crate::services::{DashboardSnapshot, SessionDraft, StudySummary, SubjectDraft};
use crate::time_utils::{parse_date, today_utc};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).put(update_me))
        .route("/api/account", delete(delete_account))
        .route("/api/subjects", get(list_subjects).post(create_subject))
        .route(
            "/api/subjects/{id}",
            put(update_subject).delete(delete_subject),
        )
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route(
            "/api/sessions/{id}",
            put(update_session).delete(delete_session),
        )
        .route("/api/goal", get(get_goal).put(set_goal))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/summary", get(get_summary))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Deserialize, Validate)]
struct ProfileRequest {
    #[validate(length(min = 1, max = 64))]
    username: String,
    #[validate(email)]
    email: String,
}

async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = state.accounts.profile(&user).await?;
    Ok(Json(profile.into()))
}

async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<ProfileRequest>,
) -> Result<Json<UserResponse>> {
    body.validate()?;
    let profile = state
        .accounts
        .update_profile(&user, &body.username, &body.email)
        .await?;
    Ok(Json(profile.into()))
}

// ─── Account Deletion ────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub records_deleted: usize,
}

/// Delete the account with all subjects, sessions and goal.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteAccountResponse>> {
    let records_deleted = state.accounts.delete_account(&user).await?;
    Ok(Json(DeleteAccountResponse {
        success: true,
        records_deleted,
    }))
}

// ─── Subjects ────────────────────────────────────────────────

#[derive(Deserialize)]
struct SubjectRequest {
    name: String,
    /// Easy when omitted
    difficulty: Option<String>,
}

impl SubjectRequest {
    fn into_draft(self) -> Result<SubjectDraft> {
        let difficulty = match self.difficulty.as_deref() {
            Some(label) => label
                .parse::<Difficulty>()
                .map_err(|e| crate::error::AppError::InvalidInput(e.to_string()))?,
            None => Difficulty::Easy,
        };
        Ok(SubjectDraft {
            name: self.name,
            difficulty,
        })
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SubjectResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub name: String,
    pub difficulty: String,
}

impl From<Subject> for SubjectResponse {
    fn from(subject: Subject) -> Self {
        Self {
            id: subject.id,
            name: subject.name,
            difficulty: subject.difficulty.to_string(),
        }
    }
}

async fn list_subjects(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<SubjectResponse>>> {
    let subjects = state.tracker.list_subjects(&user).await?;
    Ok(Json(subjects.into_iter().map(Into::into).collect()))
}

async fn create_subject(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SubjectRequest>,
) -> Result<(StatusCode, Json<SubjectResponse>)> {
    let subject = state.tracker.add_subject(&user, body.into_draft()?).await?;
    Ok((StatusCode::CREATED, Json(subject.into())))
}

async fn update_subject(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
    Json(body): Json<SubjectRequest>,
) -> Result<Json<SubjectResponse>> {
    let subject = state
        .tracker
        .update_subject(&user, id, body.into_draft()?)
        .await?;
    Ok(Json(subject.into()))
}

async fn delete_subject(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    state.tracker.remove_subject(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Sessions ────────────────────────────────────────────────

#[derive(Deserialize)]
struct SessionRequest {
    subject_id: u64,
    duration_minutes: i64,
    /// YYYY-MM-DD; today when omitted
    date: Option<String>,
}

impl SessionRequest {
    fn into_draft(self) -> Result<SessionDraft> {
        let date = self
            .date
            .as_deref()
            .map(|raw| parse_date("date", raw))
            .transpose()?;
        Ok(SessionDraft {
            subject_id: self.subject_id,
            duration_minutes: self.duration_minutes,
            date,
        })
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub subject_id: u64,
    pub duration_minutes: u32,
    pub date: String,
}

impl From<StudySession> for SessionResponse {
    fn from(session: StudySession) -> Self {
        Self {
            id: session.id,
            subject_id: session.subject_id,
            duration_minutes: session.duration_minutes,
            date: session.date.to_string(),
        }
    }
}

async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<SessionResponse>>> {
    let sessions = state.tracker.list_sessions(&user).await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

async fn create_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let session = state
        .tracker
        .log_session(&user, body.into_draft()?, today_utc())
        .await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

async fn update_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
    Json(body): Json<SessionRequest>,
) -> Result<Json<SessionResponse>> {
    let session = state
        .tracker
        .update_session(&user, id, body.into_draft()?, today_utc())
        .await?;
    Ok(Json(session.into()))
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    state.tracker.remove_session(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Goal ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct GoalRequest {
    /// YYYY-MM-DD
    exam_date: String,
}

async fn get_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Goal>> {
    Ok(Json(state.tracker.get_goal(&user).await?))
}

/// Recompute and store the goal for a (new) exam date.
async fn set_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<GoalRequest>,
) -> Result<Json<Goal>> {
    let exam_date = parse_date("exam_date", &body.exam_date)?;
    let goal = state
        .tracker
        .set_goal(&user, exam_date, today_utc())
        .await?;
    Ok(Json(goal))
}

// ─── Dashboard & Summary ─────────────────────────────────────

#[derive(Serialize)]
pub struct DashboardResponse {
    pub username: String,
    #[serde(flatten)]
    pub snapshot: DashboardSnapshot,
}

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>> {
    let profile = state.accounts.profile(&user).await?;
    let snapshot = state.tracker.dashboard(&user).await?;
    Ok(Json(DashboardResponse {
        username: profile.username,
        snapshot,
    }))
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StudySummary>> {
    Ok(Json(state.tracker.summary(&user).await?))
}
