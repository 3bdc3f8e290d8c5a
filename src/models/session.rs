// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Logged study session model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One logged interval of study time against a subject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudySession {
    /// Record ID (also used as document ID)
    pub id: u64,
    /// Owner
    pub user_id: u64,
    /// Subject studied; may dangle if the subject was removed out of band
    pub subject_id: u64,
    /// Duration in minutes, always > 0
    pub duration_minutes: u32,
    /// Calendar day the session took place
    pub date: NaiveDate,
}
