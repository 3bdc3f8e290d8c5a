// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Study tracking workflows.
//!
//! Every operation takes the caller's [`AuthUser`] explicitly and runs one
//! read-compute-write sequence against the record store:
//! 1. Load the owner's complete subject/session/goal sets
//! 2. Validate the request against them
//! 3. Compute derived values (aggregates, goal plan, progress)
//! 4. Write, only once everything above succeeded

use chrono::NaiveDate;
use ring::rand::SystemRandom;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::RecordStore;
use crate::error::{AppError, Result};
use crate::ids::new_record_id;
use crate::middleware::auth::AuthUser;
use crate::models::{Difficulty, Goal, StudySession, StudyStats, Subject};
use crate::services::planner::compute_goal;
use crate::services::progress::compute_progress;

const MAX_SUBJECT_NAME_LEN: usize = 100;

/// Client-supplied subject fields.
#[derive(Debug, Clone)]
pub struct SubjectDraft {
    pub name: String,
    pub difficulty: Difficulty,
}

/// Client-supplied session fields.
#[derive(Debug, Clone)]
pub struct SessionDraft {
    pub subject_id: u64,
    pub duration_minutes: i64,
    /// Defaults to today when absent
    pub date: Option<NaiveDate>,
}

/// Read-only dashboard snapshot handed to presentation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardSnapshot {
    pub total_subjects: u64,
    pub total_sessions: u64,
    pub total_minutes: u64,
    pub minutes_per_subject: BTreeMap<String, u64>,
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub goal: Option<Goal>,
    pub progress_percent: Option<f64>,
}

/// One row of the study summary.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SummaryEntry {
    pub session_id: u64,
    pub subject_name: String,
    pub duration_minutes: u32,
    pub date: NaiveDate,
}

/// Sessions joined with subject names.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StudySummary {
    pub sessions: Vec<SummaryEntry>,
    pub total_minutes: u64,
}

/// Subject, session and goal operations for one authenticated user at a time.
pub struct StudyTracker {
    store: Arc<dyn RecordStore>,
    rng: SystemRandom,
}

impl StudyTracker {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            rng: SystemRandom::new(),
        }
    }

    // ─── Subjects ────────────────────────────────────────────────

    pub async fn list_subjects(&self, user: &AuthUser) -> Result<Vec<Subject>> {
        self.store.list_subjects(user.user_id).await
    }

    pub async fn add_subject(&self, user: &AuthUser, draft: SubjectDraft) -> Result<Subject> {
        let subject = Subject {
            id: new_record_id(&self.rng)?,
            user_id: user.user_id,
            name: validate_subject_name(&draft.name)?,
            difficulty: draft.difficulty,
        };

        self.store.upsert_subject(&subject).await?;
        tracing::info!(
            user_id = user.user_id,
            subject_id = subject.id,
            difficulty = %subject.difficulty,
            "Subject added"
        );
        Ok(subject)
    }

    pub async fn update_subject(
        &self,
        user: &AuthUser,
        subject_id: u64,
        draft: SubjectDraft,
    ) -> Result<Subject> {
        let mut subject = self.owned_subject(user, subject_id).await?;
        subject.name = validate_subject_name(&draft.name)?;
        subject.difficulty = draft.difficulty;

        self.store.upsert_subject(&subject).await?;
        tracing::info!(user_id = user.user_id, subject_id, "Subject updated");
        Ok(subject)
    }

    /// Delete a subject and every session logged against it.
    ///
    /// Sessions go first, so a failure part-way never leaves sessions
    /// pointing at a missing subject. Returns the number of sessions removed.
    /// The goal is left as it was; it changes only when the user sets it again.
    pub async fn remove_subject(&self, user: &AuthUser, subject_id: u64) -> Result<usize> {
        self.owned_subject(user, subject_id).await?;

        let sessions_removed = self
            .store
            .delete_sessions_for_subject(user.user_id, subject_id)
            .await?;
        if !self.store.delete_subject(user.user_id, subject_id).await? {
            return Err(subject_not_found(subject_id));
        }

        tracing::info!(
            user_id = user.user_id,
            subject_id,
            sessions_removed,
            "Subject deleted"
        );
        Ok(sessions_removed)
    }

    // ─── Sessions ────────────────────────────────────────────────

    /// Sessions, most recent date first.
    pub async fn list_sessions(&self, user: &AuthUser) -> Result<Vec<StudySession>> {
        let mut sessions = self.store.list_sessions(user.user_id).await?;
        sessions.sort_by_key(|s| (Reverse(s.date), Reverse(s.id)));
        Ok(sessions)
    }

    pub async fn log_session(
        &self,
        user: &AuthUser,
        draft: SessionDraft,
        today: NaiveDate,
    ) -> Result<StudySession> {
        let duration_minutes = validate_duration(draft.duration_minutes)?;
        self.owned_subject(user, draft.subject_id).await?;

        let session = StudySession {
            id: new_record_id(&self.rng)?,
            user_id: user.user_id,
            subject_id: draft.subject_id,
            duration_minutes,
            date: draft.date.unwrap_or(today),
        };

        self.store.upsert_session(&session).await?;
        tracing::info!(
            user_id = user.user_id,
            session_id = session.id,
            subject_id = session.subject_id,
            duration_minutes,
            "Study session logged"
        );
        Ok(session)
    }

    pub async fn update_session(
        &self,
        user: &AuthUser,
        session_id: u64,
        draft: SessionDraft,
        today: NaiveDate,
    ) -> Result<StudySession> {
        let mut session = self
            .store
            .get_session(user.user_id, session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", session_id)))?;

        session.duration_minutes = validate_duration(draft.duration_minutes)?;
        self.owned_subject(user, draft.subject_id).await?;
        session.subject_id = draft.subject_id;
        session.date = draft.date.unwrap_or(today);

        self.store.upsert_session(&session).await?;
        tracing::info!(user_id = user.user_id, session_id, "Study session updated");
        Ok(session)
    }

    pub async fn remove_session(&self, user: &AuthUser, session_id: u64) -> Result<()> {
        if !self.store.delete_session(user.user_id, session_id).await? {
            return Err(AppError::NotFound(format!(
                "Session {} not found",
                session_id
            )));
        }
        tracing::info!(user_id = user.user_id, session_id, "Study session deleted");
        Ok(())
    }

    // ─── Goal ────────────────────────────────────────────────────

    /// Plan a goal for `exam_date` from the current subject set and store it,
    /// replacing any previous goal.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the user has no subjects; nothing is written.
    pub async fn set_goal(
        &self,
        user: &AuthUser,
        exam_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Goal> {
        let subjects = self.store.list_subjects(user.user_id).await?;
        let plan = compute_goal(&subjects, exam_date, today)?;

        let goal = Goal {
            user_id: user.user_id,
            exam_date,
            total_required_minutes: plan.total_required_minutes,
            recommended_daily_minutes: plan.recommended_daily_minutes,
        };
        self.store.upsert_goal(&goal).await?;

        tracing::info!(
            user_id = user.user_id,
            %exam_date,
            subjects = subjects.len(),
            total_required_minutes = goal.total_required_minutes,
            recommended_daily_minutes = goal.recommended_daily_minutes,
            "Study goal updated"
        );
        Ok(goal)
    }

    pub async fn get_goal(&self, user: &AuthUser) -> Result<Goal> {
        self.store
            .get_goal(user.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No study goal set".to_string()))
    }

    // ─── Reporting ───────────────────────────────────────────────

    pub async fn dashboard(&self, user: &AuthUser) -> Result<DashboardSnapshot> {
        let subjects = self.store.list_subjects(user.user_id).await?;
        let sessions = self.store.list_sessions(user.user_id).await?;
        let goal = self.store.get_goal(user.user_id).await?;

        let stats = StudyStats::from_records(&subjects, &sessions);
        let progress_percent = compute_progress(stats.total_minutes, goal.as_ref());

        tracing::debug!(
            user_id = user.user_id,
            subjects = subjects.len(),
            sessions = sessions.len(),
            has_goal = goal.is_some(),
            "Built dashboard snapshot"
        );

        Ok(DashboardSnapshot {
            total_subjects: subjects.len() as u64,
            total_sessions: stats.total_sessions,
            total_minutes: stats.total_minutes,
            minutes_per_subject: stats.minutes_per_subject,
            goal,
            progress_percent,
        })
    }

    /// Sessions with their subject names, most recent first.
    pub async fn summary(&self, user: &AuthUser) -> Result<StudySummary> {
        let subjects = self.store.list_subjects(user.user_id).await?;
        let names: HashMap<u64, String> = subjects.into_iter().map(|s| (s.id, s.name)).collect();

        let sessions: Vec<SummaryEntry> = self
            .list_sessions(user)
            .await?
            .into_iter()
            .filter_map(|s| {
                names.get(&s.subject_id).map(|name| SummaryEntry {
                    session_id: s.id,
                    subject_name: name.clone(),
                    duration_minutes: s.duration_minutes,
                    date: s.date,
                })
            })
            .collect();

        let total_minutes = sessions
            .iter()
            .map(|s| u64::from(s.duration_minutes))
            .sum();

        Ok(StudySummary {
            sessions,
            total_minutes,
        })
    }

    async fn owned_subject(&self, user: &AuthUser, subject_id: u64) -> Result<Subject> {
        self.store
            .get_subject(user.user_id, subject_id)
            .await?
            .ok_or_else(|| subject_not_found(subject_id))
    }
}

fn subject_not_found(subject_id: u64) -> AppError {
    AppError::NotFound(format!("Subject {} not found", subject_id))
}

fn validate_subject_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput(
            "Subject name cannot be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_SUBJECT_NAME_LEN {
        return Err(AppError::InvalidInput(format!(
            "Subject name must be at most {} characters",
            MAX_SUBJECT_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

fn validate_duration(minutes: i64) -> Result<u32> {
    if minutes <= 0 {
        return Err(AppError::InvalidInput(
            "Duration must be a positive number of minutes".to_string(),
        ));
    }
    u32::try_from(minutes)
        .map_err(|_| AppError::InvalidInput("Duration is too large".to_string()))
}
