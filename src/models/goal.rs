// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Exam goal model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The single active exam target of a user.
///
/// Stored at: `goals/{user_id}`. Both minute figures come from
/// [`crate::services::planner::compute_goal`] and are always written together.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Goal {
    /// Owner (also used as document ID)
    pub user_id: u64,
    pub exam_date: NaiveDate,
    pub total_required_minutes: u64,
    pub recommended_daily_minutes: u64,
}
