//! Progress store: which lessons each user has completed.
//!
//! The whole collection lives as one JSON array under [`PROGRESS_KEY`] and is
//! read and rewritten in full on every mutation. Every operation is fail-soft:
//! unreadable or malformed data reads as "no progress", and a failed write is
//! logged and dropped.

use std::collections::BTreeSet;
use std::sync::Arc;

use fusha_core::Clock;
use fusha_core::model::{LessonId, ProgressRecord, UserId};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::repository::{KeyValueStore, StorageError};

/// Storage key holding the serialized progress collection.
pub const PROGRESS_KEY: &str = "fusha_progress";

pub struct ProgressStore {
    kv: Arc<dyn KeyValueStore>,
    clock: Clock,
    // Serialises read-modify-write cycles issued through this handle.
    write_lock: Mutex<()>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Clock) -> Self {
        Self {
            kv,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// True iff a record exists for this exact lesson and user.
    pub async fn is_completed(&self, lesson_id: &LessonId, user_id: &UserId) -> bool {
        self.records()
            .await
            .iter()
            .any(|record| record.matches(lesson_id, user_id))
    }

    /// Record a completion, or return the existing record unchanged.
    ///
    /// A new record is stamped with the store's clock and appended to the
    /// persisted collection. If persisting fails the record is still returned
    /// so the caller can reflect the completion for the current session.
    pub async fn mark_completed(&self, lesson_id: &LessonId, user_id: &UserId) -> ProgressRecord {
        let _guard = self.write_lock.lock().await;

        let mut records = match self.load().await {
            Ok(records) => records,
            Err(err) => {
                // Writing now would replace whatever is stored with a single
                // record, so leave storage alone.
                warn!(%lesson_id, error = %err, "progress unreadable, completion not persisted");
                return ProgressRecord::new(lesson_id.clone(), user_id.clone(), self.clock.now());
            }
        };

        if let Some(existing) = records.iter().find(|r| r.matches(lesson_id, user_id)) {
            debug!(%lesson_id, "lesson already completed");
            return existing.clone();
        }

        let record = ProgressRecord::new(lesson_id.clone(), user_id.clone(), self.clock.now());
        records.push(record.clone());
        self.persist(&records).await;
        record
    }

    /// Lesson ids completed by `user_id`.
    pub async fn list_completed(&self, user_id: &UserId) -> BTreeSet<LessonId> {
        self.records()
            .await
            .into_iter()
            .filter(|record| &record.user_id == user_id)
            .map(|record| record.lesson_id)
            .collect()
    }

    /// Every stored record, for every user.
    pub async fn records(&self) -> Vec<ProgressRecord> {
        match self.load().await {
            Ok(records) => records,
            Err(err) => {
                warn!(key = PROGRESS_KEY, error = %err, "progress unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    /// Delete all progress for all users.
    pub async fn clear_all(&self) {
        let _guard = self.write_lock.lock().await;
        if let Err(err) = self.kv.remove(PROGRESS_KEY).await {
            warn!(key = PROGRESS_KEY, error = %err, "failed to clear progress");
        }
    }

    /// Malformed JSON is reported as empty; only backend failures are errors.
    async fn load(&self) -> Result<Vec<ProgressRecord>, StorageError> {
        let Some(raw) = self.kv.get(PROGRESS_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<ProgressRecord>>(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!(key = PROGRESS_KEY, error = %err, "malformed progress data ignored");
                Ok(Vec::new())
            }
        }
    }

    async fn persist(&self, records: &[ProgressRecord]) {
        let raw = match serde_json::to_string(records) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "failed to serialize progress");
                return;
            }
        };

        if let Err(err) = self.kv.set(PROGRESS_KEY, &raw).await {
            warn!(key = PROGRESS_KEY, error = %err, "failed to persist progress");
        }
    }
}
