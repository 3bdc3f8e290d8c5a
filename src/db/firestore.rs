// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! Firestore client wrapper implementing the record store.
//!
//! Collections:
//! - `users/{id}`
//! - `usernames/{encoded username}` (claim holding the owner's id)
//! - `subjects/{id}` (filtered by `user_id`)
//! - `sessions/{id}` (filtered by `user_id`)
//! - `goals/{user_id}`

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::db::{collections, RecordStore};
use crate::error::AppError;
use crate::models::{Goal, StudySession, Subject, User};

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Marks a username as taken. Written with an exists(false) precondition,
/// so two users can never hold the same claim.
#[derive(Debug, Serialize, Deserialize)]
struct UsernameClaim {
    user_id: u64,
}

/// Document ID for a username claim; usernames may contain `/`.
fn username_key(username: &str) -> String {
    URL_SAFE_NO_PAD.encode(username.as_bytes())
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline client for testing.
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    async fn get_doc<T>(&self, collection: &str, id: u64) -> Result<Option<T>, AppError>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(&id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn put_doc<T>(&self, collection: &str, id: u64, doc: &T) -> Result<(), AppError>
    where
        T: serde::Serialize + serde::de::DeserializeOwned + Send + Sync,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id.to_string())
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete_doc(&self, collection: &str, id: u64) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(id.to_string())
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All documents of a collection owned by `user_id`.
    async fn owned_docs<T>(&self, collection: &str, user_id: u64) -> Result<Vec<T>, AppError>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(|q| q.for_all([q.field("user_id").eq(user_id)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete documents by ID in transactional batches.
    async fn batch_delete(&self, collection: &str, ids: &[u64]) -> Result<(), AppError> {
        let client = self.get_client()?;

        for chunk in ids.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for id in chunk {
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(id.to_string())
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    async fn username_holder(&self, username: &str) -> Result<Option<u64>, AppError> {
        let claim: Option<UsernameClaim> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERNAMES)
            .obj()
            .one(&username_key(username))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(claim.map(|c| c.user_id))
    }

    /// Add a claim on `username` for `user_id` that fails if one exists.
    fn claim_username(
        &self,
        transaction: &mut firestore::FirestoreTransaction<'_>,
        username: &str,
        user_id: u64,
    ) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::USERNAMES)
            .precondition(firestore::FirestoreWritePrecondition::Exists(false))
            .document_id(username_key(username))
            .object(&UsernameClaim { user_id })
            .add_to_transaction(transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add username claim to transaction: {}", e))
            })?;
        Ok(())
    }

    /// Commit a transaction carrying a username claim.
    ///
    /// A failed commit is reported as `Conflict` when the name turns out to
    /// be held by someone else.
    async fn commit_with_claim(
        &self,
        transaction: firestore::FirestoreTransaction<'_>,
        username: &str,
        user_id: u64,
    ) -> Result<(), AppError> {
        if let Err(e) = transaction.commit().await {
            return match self.username_holder(username).await? {
                Some(holder) if holder != user_id => Err(AppError::Conflict(
                    "Username already exists. Please choose another.".to_string(),
                )),
                _ => Err(AppError::Database(format!(
                    "Failed to commit user write: {}",
                    e
                ))),
            };
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    async fn get_user(&self, user_id: u64) -> Result<Option<User>, AppError> {
        self.get_doc(collections::USERS, user_id).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let Some(user_id) = self.username_holder(username).await? else {
            return Ok(None);
        };
        let user = self.get_user(user_id).await?;
        Ok(user.filter(|u| u.username == username))
    }

    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let client = self.get_client()?;
        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        self.claim_username(&mut transaction, &user.username, user.id)?;
        client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user.id.to_string())
            .object(user)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add user to transaction: {}", e)))?;

        self.commit_with_claim(transaction, &user.username, user.id)
            .await
    }

    async fn update_user(&self, user: &User) -> Result<(), AppError> {
        let current = self
            .get_user(user.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.id)))?;
        if current.username == user.username {
            return self.put_doc(collections::USERS, user.id, user).await;
        }

        let client = self.get_client()?;
        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        self.claim_username(&mut transaction, &user.username, user.id)?;
        client
            .fluent()
            .delete()
            .from(collections::USERNAMES)
            .document_id(username_key(&current.username))
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add claim release to transaction: {}", e))
            })?;
        client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user.id.to_string())
            .object(user)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add user to transaction: {}", e)))?;

        self.commit_with_claim(transaction, &user.username, user.id)
            .await
    }

    /// Deletes from all collections:
    /// - `sessions` (query by user_id)
    /// - `subjects` (query by user_id)
    /// - `goals/{user_id}`
    /// - `usernames/{key}` and `users/{user_id}`
    async fn delete_user(&self, user_id: u64) -> Result<usize, AppError> {
        let mut deleted_count = 0;

        let sessions: Vec<StudySession> = self.owned_docs(collections::SESSIONS, user_id).await?;
        let ids: Vec<u64> = sessions.iter().map(|s| s.id).collect();
        self.batch_delete(collections::SESSIONS, &ids).await?;
        deleted_count += ids.len();
        tracing::debug!(user_id, count = ids.len(), "Deleted sessions");

        let subjects: Vec<Subject> = self.owned_docs(collections::SUBJECTS, user_id).await?;
        let ids: Vec<u64> = subjects.iter().map(|s| s.id).collect();
        self.batch_delete(collections::SUBJECTS, &ids).await?;
        deleted_count += ids.len();
        tracing::debug!(user_id, count = ids.len(), "Deleted subjects");

        if self.get_goal(user_id).await?.is_some() {
            self.delete_doc(collections::GOALS, user_id).await?;
            deleted_count += 1;
        }

        if let Some(user) = self.get_user(user_id).await? {
            self.get_client()?
                .fluent()
                .delete()
                .from(collections::USERNAMES)
                .document_id(username_key(&user.username))
                .execute()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            self.delete_doc(collections::USERS, user_id).await?;
            deleted_count += 1;
        }

        tracing::info!(user_id, deleted_count, "User data deletion complete");

        Ok(deleted_count)
    }

    // ─── Subject Operations ──────────────────────────────────────

    async fn list_subjects(&self, user_id: u64) -> Result<Vec<Subject>, AppError> {
        let mut subjects: Vec<Subject> = self.owned_docs(collections::SUBJECTS, user_id).await?;
        subjects.sort_by_key(|s| s.id);
        Ok(subjects)
    }

    async fn get_subject(
        &self,
        user_id: u64,
        subject_id: u64,
    ) -> Result<Option<Subject>, AppError> {
        let subject: Option<Subject> = self.get_doc(collections::SUBJECTS, subject_id).await?;
        Ok(subject.filter(|s| s.user_id == user_id))
    }

    async fn upsert_subject(&self, subject: &Subject) -> Result<(), AppError> {
        self.put_doc(collections::SUBJECTS, subject.id, subject).await
    }

    async fn delete_subject(&self, user_id: u64, subject_id: u64) -> Result<bool, AppError> {
        if self.get_subject(user_id, subject_id).await?.is_none() {
            return Ok(false);
        }
        self.delete_doc(collections::SUBJECTS, subject_id).await?;
        Ok(true)
    }

    // ─── Session Operations ──────────────────────────────────────

    async fn list_sessions(&self, user_id: u64) -> Result<Vec<StudySession>, AppError> {
        let mut sessions: Vec<StudySession> =
            self.owned_docs(collections::SESSIONS, user_id).await?;
        sessions.sort_by_key(|s| s.id);
        Ok(sessions)
    }

    async fn get_session(
        &self,
        user_id: u64,
        session_id: u64,
    ) -> Result<Option<StudySession>, AppError> {
        let session: Option<StudySession> =
            self.get_doc(collections::SESSIONS, session_id).await?;
        Ok(session.filter(|s| s.user_id == user_id))
    }

    async fn upsert_session(&self, session: &StudySession) -> Result<(), AppError> {
        self.put_doc(collections::SESSIONS, session.id, session).await
    }

    async fn delete_session(&self, user_id: u64, session_id: u64) -> Result<bool, AppError> {
        if self.get_session(user_id, session_id).await?.is_none() {
            return Ok(false);
        }
        self.delete_doc(collections::SESSIONS, session_id).await?;
        Ok(true)
    }

    async fn delete_sessions_for_subject(
        &self,
        user_id: u64,
        subject_id: u64,
    ) -> Result<usize, AppError> {
        let sessions: Vec<StudySession> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::SESSIONS)
            .filter(|q| {
                q.for_all([
                    q.field("user_id").eq(user_id),
                    q.field("subject_id").eq(subject_id),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let ids: Vec<u64> = sessions.iter().map(|s| s.id).collect();
        self.batch_delete(collections::SESSIONS, &ids).await?;
        Ok(ids.len())
    }

    // ─── Goal Operations ─────────────────────────────────────────

    async fn get_goal(&self, user_id: u64) -> Result<Option<Goal>, AppError> {
        self.get_doc(collections::GOALS, user_id).await
    }

    async fn upsert_goal(&self, goal: &Goal) -> Result<(), AppError> {
        self.put_doc(collections::GOALS, goal.user_id, goal).await
    }
}
