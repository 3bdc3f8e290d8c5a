// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Study Tracker: log subjects and study sessions, plan toward an exam.
//!
//! This crate provides the backend API: accounts, subject and session
//! records, exam goal planning and progress reporting.

pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::RecordStore;
use services::{AccountService, StudyTracker};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn RecordStore>,
    pub accounts: AccountService,
    pub tracker: StudyTracker,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RecordStore>) -> Self {
        Self {
            config,
            accounts: AccountService::new(store.clone()),
            tracker: StudyTracker::new(store.clone()),
            store,
        }
    }
}
