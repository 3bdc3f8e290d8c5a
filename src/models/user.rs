// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// Registered account stored in the record store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Record ID (also used as document ID)
    pub id: u64,
    /// Unique login name
    pub username: String,
    /// Contact email
    pub email: String,
    /// Argon2id PHC string (see `services::credentials`)
    pub password_hash: String,
    /// When the account was created (RFC 3339)
    pub created_at: String,
}
