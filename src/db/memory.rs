// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! In-process record store.
//!
//! Used for local development and tests. Each map is keyed by record ID;
//! owner filtering happens on read.

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;

use crate::db::RecordStore;
use crate::error::AppError;
use crate::models::{Goal, StudySession, Subject, User};

/// DashMap-backed store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<DashMap<u64, User>>,
    /// username -> user id; the entry lock makes claiming a name atomic
    usernames: Arc<DashMap<String, u64>>,
    subjects: Arc<DashMap<u64, Subject>>,
    sessions: Arc<DashMap<u64, StudySession>>,
    goals: Arc<DashMap<u64, Goal>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn username_taken() -> AppError {
    AppError::Conflict("Username already exists. Please choose another.".to_string())
}

/// Remove every entry matching `doomed`, returning how many went.
///
/// Counted inside `retain` so concurrent inserts by other users cannot skew it.
fn remove_matching<V>(map: &DashMap<u64, V>, mut doomed: impl FnMut(&V) -> bool) -> usize {
    let mut removed = 0;
    map.retain(|_, v| {
        if doomed(v) {
            removed += 1;
            false
        } else {
            true
        }
    });
    removed
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_user(&self, user_id: u64) -> Result<Option<User>, AppError> {
        Ok(self.users.get(&user_id).map(|u| u.clone()))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let Some(user_id) = self.usernames.get(username).map(|id| *id) else {
            return Ok(None);
        };
        self.get_user(user_id).await
    }

    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        match self.usernames.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(username_taken()),
            Entry::Vacant(slot) => {
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(())
            }
        }
    }

    async fn update_user(&self, user: &User) -> Result<(), AppError> {
        let previous = self
            .users
            .get(&user.id)
            .map(|u| u.username.clone())
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.id)))?;

        if previous != user.username {
            match self.usernames.entry(user.username.clone()) {
                Entry::Occupied(holder) if *holder.get() != user.id => {
                    return Err(username_taken())
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(slot) => {
                    slot.insert(user.id);
                }
            }
            self.usernames.remove_if(&previous, |_, id| *id == user.id);
        }

        self.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete_user(&self, user_id: u64) -> Result<usize, AppError> {
        let mut deleted = remove_matching(&self.sessions, |s| s.user_id == user_id);
        deleted += remove_matching(&self.subjects, |s| s.user_id == user_id);

        if self.goals.remove(&user_id).is_some() {
            deleted += 1;
        }
        if self.users.remove(&user_id).is_some() {
            deleted += 1;
        }
        self.usernames.retain(|_, id| *id != user_id);

        tracing::debug!(user_id, deleted, "Removed user records from memory store");
        Ok(deleted)
    }

    async fn list_subjects(&self, user_id: u64) -> Result<Vec<Subject>, AppError> {
        let mut subjects: Vec<Subject> = self
            .subjects
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.clone())
            .collect();
        subjects.sort_by_key(|s| s.id);
        Ok(subjects)
    }

    async fn get_subject(
        &self,
        user_id: u64,
        subject_id: u64,
    ) -> Result<Option<Subject>, AppError> {
        Ok(self
            .subjects
            .get(&subject_id)
            .filter(|s| s.user_id == user_id)
            .map(|s| s.clone()))
    }

    async fn upsert_subject(&self, subject: &Subject) -> Result<(), AppError> {
        self.subjects.insert(subject.id, subject.clone());
        Ok(())
    }

    async fn delete_subject(&self, user_id: u64, subject_id: u64) -> Result<bool, AppError> {
        Ok(self
            .subjects
            .remove_if(&subject_id, |_, s| s.user_id == user_id)
            .is_some())
    }

    async fn list_sessions(&self, user_id: u64) -> Result<Vec<StudySession>, AppError> {
        let mut sessions: Vec<StudySession> = self
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.clone())
            .collect();
        sessions.sort_by_key(|s| s.id);
        Ok(sessions)
    }

    async fn get_session(
        &self,
        user_id: u64,
        session_id: u64,
    ) -> Result<Option<StudySession>, AppError> {
        Ok(self
            .sessions
            .get(&session_id)
            .filter(|s| s.user_id == user_id)
            .map(|s| s.clone()))
    }

    async fn upsert_session(&self, session: &StudySession) -> Result<(), AppError> {
        self.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn delete_session(&self, user_id: u64, session_id: u64) -> Result<bool, AppError> {
        Ok(self
            .sessions
            .remove_if(&session_id, |_, s| s.user_id == user_id)
            .is_some())
    }

    async fn delete_sessions_for_subject(
        &self,
        user_id: u64,
        subject_id: u64,
    ) -> Result<usize, AppError> {
        Ok(remove_matching(&self.sessions, |s| {
            s.user_id == user_id && s.subject_id == subject_id
        }))
    }

    async fn get_goal(&self, user_id: u64) -> Result<Option<Goal>, AppError> {
        Ok(self.goals.get(&user_id).map(|g| *g))
    }

    async fn upsert_goal(&self, goal: &Goal) -> Result<(), AppError> {
        self.goals.insert(goal.user_id, *goal);
        Ok(())
    }
}
