// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Exam goal planning.
//!
//! The plan is a fixed linear budget: each subject contributes an hour
//! allowance determined by its difficulty, and the total is spread evenly
//! over the days left before the exam.

use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::models::Subject;

/// Derived minute figures of a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalPlan {
    pub total_required_minutes: u64,
    pub recommended_daily_minutes: u64,
}

/// Compute the study budget for `subjects` with an exam on `exam_date`.
///
/// Days left are clamped to at least one, so an exam today or in the past
/// asks for the whole budget in a single day. The daily pace is rounded half
/// to even.
///
/// # Errors
///
/// `InvalidInput` if `subjects` is empty.
pub fn compute_goal(subjects: &[Subject], exam_date: NaiveDate, today: NaiveDate) -> Result<GoalPlan> {
    if subjects.is_empty() {
        return Err(AppError::InvalidInput(
            "Add at least one subject before setting a goal".to_string(),
        ));
    }

    let total_hours: u64 = subjects
        .iter()
        .map(|s| s.difficulty.hour_allowance())
        .sum();
    let total_required_minutes = total_hours * 60;

    let days_left = (exam_date - today).num_days().max(1) as u64;

    Ok(GoalPlan {
        total_required_minutes,
        recommended_daily_minutes: div_round_half_even(total_required_minutes, days_left),
    })
}

/// `numerator / denominator` rounded to the nearest integer, ties to even.
fn div_round_half_even(numerator: u64, denominator: u64) -> u64 {
    let quotient = numerator / denominator;
    let twice_remainder = 2 * (numerator % denominator);

    if twice_remainder > denominator || (twice_remainder == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}
