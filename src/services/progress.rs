// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Goal completion percentage.

use crate::models::Goal;

/// Percentage of the goal's required minutes already studied.
///
/// Returns `None` when there is no goal or it requires no time, so callers
/// never show 0% for a target that was never set. The value is rounded to one
/// decimal (ties to even) and may exceed 100.
pub fn compute_progress(total_minutes_studied: u64, goal: Option<&Goal>) -> Option<f64> {
    let required = goal?.total_required_minutes;
    if required == 0 {
        return None;
    }

    // Work in tenths of a percent on exact integers.
    let numerator = u128::from(total_minutes_studied) * 1000;
    let denominator = u128::from(required);
    let mut tenths = numerator / denominator;
    let twice_remainder = 2 * (numerator % denominator);
    if twice_remainder > denominator || (twice_remainder == denominator && tenths % 2 == 1) {
        tenths += 1;
    }

    Some(tenths as f64 / 10.0)
}
