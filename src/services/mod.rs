// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Services module - business logic layer.

pub mod accounts;
pub mod credentials;
pub mod planner;
pub mod progress;
pub mod tracker;

pub use accounts::{AccountService, Registration};
pub use planner::{compute_goal, GoalPlan};
pub use progress::compute_progress;
pub use tracker::{DashboardSnapshot, SessionDraft, StudySummary, StudyTracker, SubjectDraft};
