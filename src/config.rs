// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

/// Which record store backs the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local store; contents are lost on restart
    Memory,
    /// Google Cloud Firestore (or its emulator)
    Firestore,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "firestore" => Ok(StoreBackend::Firestore),
            _ => Err(ConfigError::Invalid("RECORD_STORE", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Record store backend
    pub store_backend: StoreBackend,
    /// GCP project ID (Firestore backend only)
    pub gcp_project_id: Option<String>,
    /// Lifetime of issued session tokens
    pub session_ttl_days: u64,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            store_backend: StoreBackend::Memory,
            gcp_project_id: None,
            session_ttl_days: 30,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let store_backend = match env::var("RECORD_STORE") {
            Ok(raw) => raw.parse()?,
            Err(_) => StoreBackend::Memory,
        };

        let gcp_project_id = env::var("GCP_PROJECT_ID").ok();
        if store_backend == StoreBackend::Firestore && gcp_project_id.is_none() {
            return Err(ConfigError::Missing("GCP_PROJECT_ID"));
        }

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            store_backend,
            gcp_project_id,
            session_ttl_days: session_ttl_days(env::var("SESSION_TTL_DAYS").ok().as_deref()),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
        })
    }
}

const DEFAULT_SESSION_TTL_DAYS: u64 = 30;
/// Upper bound on token lifetime; keeps cookie max-age and `exp` arithmetic in range.
const MAX_SESSION_TTL_DAYS: u64 = 365;

/// Parse `SESSION_TTL_DAYS`, clamped to `1..=365`. Unparseable values fall back to 30.
fn session_ttl_days(raw: Option<&str>) -> u64 {
    let days = raw
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_SESSION_TTL_DAYS);
    if days > MAX_SESSION_TTL_DAYS {
        tracing::warn!(days, max = MAX_SESSION_TTL_DAYS, "SESSION_TTL_DAYS too large, clamping");
    }
    days.clamp(1, MAX_SESSION_TTL_DAYS)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
