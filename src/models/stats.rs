// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Per-user study aggregates for dashboard queries.
//!
//! Aggregates are recomputed on every read from the complete subject and
//! session sets of one owner; nothing is stored.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::models::{StudySession, Subject};

/// Totals derived from one user's sessions.
///
/// Sessions whose subject no longer exists are left out of every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyStats {
    /// Number of counted sessions
    #[serde(default)]
    pub total_sessions: u64,
    /// Sum of counted session durations (minutes)
    #[serde(default)]
    pub total_minutes: u64,
    /// Minutes per subject name; subjects without sessions are absent
    #[serde(default)]
    pub minutes_per_subject: BTreeMap<String, u64>,
}

impl StudyStats {
    /// Aggregate a user's sessions against their subjects.
    ///
    /// Subjects are joined in memory by ID. Subjects sharing a name share one
    /// entry in `minutes_per_subject`.
    pub fn from_records(subjects: &[Subject], sessions: &[StudySession]) -> Self {
        let names: HashMap<u64, &str> = subjects
            .iter()
            .map(|s| (s.id, s.name.as_str()))
            .collect();

        let mut stats = Self::default();
        for session in sessions {
            match names.get(&session.subject_id) {
                Some(name) => stats.record_session(name, session.duration_minutes),
                None => tracing::debug!(
                    session_id = session.id,
                    subject_id = session.subject_id,
                    "Dropping orphaned session from aggregates"
                ),
            }
        }
        stats
    }

    /// Add one session for the named subject.
    fn record_session(&mut self, subject_name: &str, minutes: u32) {
        let minutes = u64::from(minutes);
        self.total_sessions += 1;
        self.total_minutes += minutes;
        *self
            .minutes_per_subject
            .entry(subject_name.to_string())
            .or_insert(0) += minutes;
    }
}
