// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Account lifecycle: registration, login, profile edits and deletion.

use ring::rand::SystemRandom;
use std::sync::Arc;

use crate::db::RecordStore;
use crate::error::{AppError, Result};
use crate::ids::new_record_id;
use crate::middleware::auth::AuthUser;
use crate::models::User;
use crate::services::credentials::{hash_password, validate_new_password, verify_password};
use crate::time_utils::format_utc_rfc3339;

/// Registration form after deserialization.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

pub struct AccountService {
    store: Arc<dyn RecordStore>,
    rng: SystemRandom,
}

impl AccountService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            rng: SystemRandom::new(),
        }
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty username or a password that breaks the
    /// rules, `Conflict` if the username is taken.
    pub async fn register(&self, form: Registration) -> Result<User> {
        let username = normalize_username(&form.username)?;

        // Early answer for the common case; `create_user` decides races
        if self.store.find_user_by_username(&username).await?.is_some() {
            return Err(AppError::Conflict(
                "Username already exists. Please choose another.".to_string(),
            ));
        }

        validate_new_password(&form.password, &form.confirm_password)?;

        let password = form.password;
        let password_hash = run_blocking(move || hash_password(&password)).await??;

        let user = User {
            id: new_record_id(&self.rng)?,
            username,
            email: form.email.trim().to_string(),
            password_hash,
            created_at: format_utc_rfc3339(chrono::Utc::now()),
        };
        self.store.create_user(&user).await?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Check credentials.
    ///
    /// Unknown usernames and wrong passwords fail the same way.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let user = self.store.find_user_by_username(username.trim()).await?;

        let verified = match &user {
            Some(user) => {
                let stored = user.password_hash.clone();
                let password = password.to_string();
                run_blocking(move || verify_password(&stored, &password)).await?
            }
            None => false,
        };

        match user {
            Some(user) if verified => {
                tracing::info!(user_id = user.id, "User logged in");
                Ok(user)
            }
            _ => {
                tracing::warn!(username = %username.trim(), "Failed login attempt");
                Err(AppError::Unauthorized)
            }
        }
    }

    pub async fn profile(&self, user: &AuthUser) -> Result<User> {
        self.store
            .get_user(user.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))
    }

    /// Change username and email.
    pub async fn update_profile(
        &self,
        user: &AuthUser,
        username: &str,
        email: &str,
    ) -> Result<User> {
        let mut profile = self.profile(user).await?;

        profile.username = normalize_username(username)?;
        profile.email = email.trim().to_string();
        self.store.update_user(&profile).await?;

        tracing::info!(user_id = profile.id, "Profile updated");
        Ok(profile)
    }

    /// Remove the account and everything it owns.
    pub async fn delete_account(&self, user: &AuthUser) -> Result<usize> {
        tracing::info!(user_id = user.user_id, "User-initiated account deletion");
        let deleted = self.store.delete_user(user.user_id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!(
                "User {} not found",
                user.user_id
            )));
        }
        Ok(deleted)
    }
}

/// Run CPU-heavy credential work off the async workers.
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Credential task failed: {}", e)))
}

fn normalize_username(raw: &str) -> Result<String> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(AppError::InvalidInput(
            "Username cannot be empty.".to_string(),
        ));
    }
    Ok(username.to_string())
}
