// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Middleware modules.

pub mod auth;
pub mod security;

pub use auth::require_auth;
