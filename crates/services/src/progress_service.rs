use std::collections::BTreeSet;
use std::sync::Arc;

use fusha_core::model::{LessonId, LessonState, ProgressRecord, UserId};
use storage::{CatalogRepository, ProgressStore};
use tracing::info;

use crate::error::ProgressServiceError;

/// Progress operations for the current device's user.
pub struct ProgressService {
    store: Arc<ProgressStore>,
    catalog: Arc<dyn CatalogRepository>,
    user: UserId,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        store: Arc<ProgressStore>,
        catalog: Arc<dyn CatalogRepository>,
        user: UserId,
    ) -> Self {
        Self {
            store,
            catalog,
            user,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user
    }

    pub async fn is_completed(&self, lesson_id: &LessonId) -> bool {
        self.store.is_completed(lesson_id, &self.user).await
    }

    pub async fn lesson_state(&self, lesson_id: &LessonId) -> LessonState {
        LessonState::from_completed(self.is_completed(lesson_id).await)
    }

    /// Mark a catalog lesson complete. Repeating the call is a no-op that
    /// returns the original record.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::UnknownLesson` if the lesson is not in
    /// the catalog, or `Storage` if the catalog cannot be read.
    pub async fn complete_lesson(
        &self,
        lesson_id: &LessonId,
    ) -> Result<ProgressRecord, ProgressServiceError> {
        if self.catalog.get_lesson(lesson_id).await?.is_none() {
            return Err(ProgressServiceError::UnknownLesson(lesson_id.clone()));
        }
        let record = self.store.mark_completed(lesson_id, &self.user).await;
        info!(%lesson_id, completed_at = %record.completed_at, "lesson completed");
        Ok(record)
    }

    /// Snapshot of the current user's completed lessons.
    pub async fn completed(&self) -> BTreeSet<LessonId> {
        self.store.list_completed(&self.user).await
    }

    /// Remove all local progress.
    ///
    /// This is not scoped to the current user: every record on the device is
    /// dropped.
    pub async fn reset(&self) {
        self.store.clear_all().await;
        info!("local progress cleared");
    }

    /// Pretty-printed JSON of every stored record.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Export` if serialization fails.
    pub async fn export_json(&self) -> Result<String, ProgressServiceError> {
        let records = self.store.records().await;
        Ok(serde_json::to_string_pretty(&records)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fusha_core::time::fixed_clock;
    use storage::{InMemoryCatalog, InMemoryRepository};

    fn service() -> ProgressService {
        let store = ProgressStore::new(Arc::new(InMemoryRepository::new()), fixed_clock());
        let catalog: Arc<dyn CatalogRepository> =
            Arc::new(InMemoryCatalog::builtin().unwrap());
        ProgressService::new(Arc::new(store), catalog, UserId::new("u1"))
    }

    #[tokio::test]
    async fn unknown_lesson_is_rejected() {
        let svc = service();
        let err = svc
            .complete_lesson(&LessonId::new("not-a-lesson"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressServiceError::UnknownLesson(_)));
        assert!(svc.completed().await.is_empty());
    }

    #[tokio::test]
    async fn lesson_state_moves_forward_only_until_reset() {
        let svc = service();
        let id = LessonId::new("a1-m1-l1");
        assert_eq!(svc.lesson_state(&id).await, LessonState::NotCompleted);

        svc.complete_lesson(&id).await.unwrap();
        svc.complete_lesson(&id).await.unwrap();
        assert_eq!(svc.lesson_state(&id).await, LessonState::Completed);
        assert_eq!(svc.completed().await.len(), 1);

        svc.reset().await;
        assert_eq!(svc.lesson_state(&id).await, LessonState::NotCompleted);
    }

    #[tokio::test]
    async fn export_lists_records() {
        let svc = service();
        svc.complete_lesson(&LessonId::new("a1-m1-l2")).await.unwrap();
        let json = svc.export_json().await.unwrap();
        assert!(json.contains("\"lessonId\": \"a1-m1-l2\""));
    }
}
