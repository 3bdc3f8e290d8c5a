// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Data models for the application.

pub mod goal;
pub mod session;
pub mod stats;
pub mod subject;
pub mod user;

pub use goal::Goal;
pub use session::StudySession;
pub use stats::StudyStats;
pub use subject::{Difficulty, Subject};
pub use user::User;
