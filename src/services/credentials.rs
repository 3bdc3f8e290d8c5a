// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Password policy and credential hashing.
//!
//! Hashes are Argon2id PHC strings (`$argon2id$v=19$...`), salt included.

use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::{AppError, Result};

const MIN_PASSWORD_LEN: usize = 8;

/// Check a new password against the account password rules.
///
/// # Errors
///
/// `InvalidInput` describing the first rule that fails.
pub fn validate_new_password(password: &str, confirm_password: &str) -> Result<()> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LEN;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(long_enough && has_upper && has_lower && has_digit) {
        return Err(AppError::InvalidInput(
            "Password must be at least 8 characters and include one uppercase, \
             one lowercase letter, and one number"
                .to_string(),
        ));
    }

    if password != confirm_password {
        return Err(AppError::InvalidInput("Passwords do not match".to_string()));
    }

    Ok(())
}

/// Derive a salted credential hash for storage.
///
/// CPU-bound; call from a blocking task.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check `password` against a stored credential hash.
///
/// Malformed stored hashes never verify. CPU-bound; call from a blocking task.
pub fn verify_password(stored: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        tracing::warn!("Stored credential hash could not be parsed");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_rules() {
        assert!(validate_new_password("Secret123", "Secret123").is_ok());

        for weak in ["Sh0rt", "alllowercase1", "ALLUPPERCASE1", "NoDigitsHere"] {
            let err = validate_new_password(weak, weak).unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)), "accepted {weak:?}");
        }
    }

    #[test]
    fn test_confirmation_must_match() {
        let err = validate_new_password("Secret123", "Secret124").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(msg) if msg.contains("match")));
    }

    #[test]
    fn test_hash_and_verify() {
        let stored = hash_password("Secret123").unwrap();

        assert!(stored.starts_with("$argon2id$"));
        assert!(verify_password(&stored, "Secret123"));
        assert!(!verify_password(&stored, "secret123"));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = hash_password("Secret123").unwrap();
        let b = hash_password("Secret123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("", "anything"));
        assert!(!verify_password("plaintext", "plaintext"));
        assert!(!verify_password("$md5$abc$def", "anything"));
        assert!(!verify_password("$argon2id$v=19$m=19456,t=2,p=1$!!$!!", "anything"));
    }
}
