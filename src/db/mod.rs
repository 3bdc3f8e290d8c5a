// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Record store layer.
//!
//! Every subject, session and goal lookup is scoped by owner: a record that
//! exists but belongs to another user is reported as absent.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Goal, StudySession, Subject, User};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Username claims (keyed by encoded username, holding the owner's id)
    pub const USERNAMES: &str = "usernames";
    pub const SUBJECTS: &str = "subjects";
    pub const SESSIONS: &str = "sessions";
    /// Goals (keyed by user_id)
    pub const GOALS: &str = "goals";
}

/// Persistence contract for users, subjects, sessions and goals.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // ─── Users ───────────────────────────────────────────────────

    async fn get_user(&self, user_id: u64) -> Result<Option<User>, AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Store a new user, claiming its username.
    ///
    /// Fails with `Conflict` if the username is already held; in that case
    /// nothing is written.
    async fn create_user(&self, user: &User) -> Result<(), AppError>;

    /// Overwrite an existing user, moving the username claim if it changed.
    ///
    /// Fails with `Conflict` if the new username is held by another user.
    async fn update_user(&self, user: &User) -> Result<(), AppError>;

    /// Delete a user together with their subjects, sessions and goal.
    ///
    /// Returns the number of records removed.
    async fn delete_user(&self, user_id: u64) -> Result<usize, AppError>;

    // ─── Subjects ────────────────────────────────────────────────

    async fn list_subjects(&self, user_id: u64) -> Result<Vec<Subject>, AppError>;

    async fn get_subject(&self, user_id: u64, subject_id: u64)
        -> Result<Option<Subject>, AppError>;

    async fn upsert_subject(&self, subject: &Subject) -> Result<(), AppError>;

    /// Returns `false` if no such subject is owned by `user_id`.
    async fn delete_subject(&self, user_id: u64, subject_id: u64) -> Result<bool, AppError>;

    // ─── Sessions ────────────────────────────────────────────────

    async fn list_sessions(&self, user_id: u64) -> Result<Vec<StudySession>, AppError>;

    async fn get_session(
        &self,
        user_id: u64,
        session_id: u64,
    ) -> Result<Option<StudySession>, AppError>;

    async fn upsert_session(&self, session: &StudySession) -> Result<(), AppError>;

    /// Returns `false` if no such session is owned by `user_id`.
    async fn delete_session(&self, user_id: u64, session_id: u64) -> Result<bool, AppError>;

    /// Remove every session logged against a subject; returns how many.
    async fn delete_sessions_for_subject(
        &self,
        user_id: u64,
        subject_id: u64,
    ) -> Result<usize, AppError>;

    // ─── Goals ───────────────────────────────────────────────────

    async fn get_goal(&self, user_id: u64) -> Result<Option<Goal>, AppError>;

    /// Create or overwrite the user's single goal.
    async fn upsert_goal(&self, goal: &Goal) -> Result<(), AppError>;
}
