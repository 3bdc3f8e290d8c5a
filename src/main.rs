// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Study Tracker API Server
//!
//! Records study subjects and sessions, plans daily study time toward
//! an exam date and reports progress.

use study_tracker::{
    config::{Config, StoreBackend},
    db::{FirestoreDb, MemoryStore, RecordStore},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        store = ?config.store_backend,
        "Starting Study Tracker API"
    );

    let store: Arc<dyn RecordStore> = match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory record store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Firestore => {
            let project = config.gcp_project_id.as_deref().unwrap_or_default();
            Arc::new(FirestoreDb::new(project).await?)
        }
    };

    let port = config.port;
    let state = Arc::new(AppState::new(config, store));

    // Build router
    let app = study_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("study_tracker=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
