use std::sync::Arc;

use fusha_core::model::{LessonId, LessonState, Level, ModuleId};
use fusha_core::navigation::{self, LessonRef};
use fusha_core::progress::{self, LevelProgress, ModuleProgress, OverallStats};
use storage::{CatalogRepository, LessonEntry};

use crate::error::CurriculumError;
use crate::progress_service::ProgressService;

/// Enough of a lesson to render a "previous"/"next" link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonSummary {
    pub id: LessonId,
    pub title: String,
    pub level_code: String,
    pub module_id: ModuleId,
}

impl From<LessonRef<'_>> for LessonSummary {
    fn from(r: LessonRef<'_>) -> Self {
        Self {
            id: r.lesson.id.clone(),
            title: r.lesson.title.clone(),
            level_code: r.level.code.clone(),
            module_id: r.module.id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbours {
    pub previous: Option<LessonSummary>,
    pub next: Option<LessonSummary>,
}

/// A lesson as the lesson page shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonView {
    pub entry: LessonEntry,
    pub state: LessonState,
    pub neighbours: Neighbours,
}

/// Read side over the catalog and the current user's progress.
///
/// Every figure is recomputed from a fresh progress snapshot.
pub struct CurriculumService {
    catalog: Arc<dyn CatalogRepository>,
    progress: Arc<ProgressService>,
}

impl CurriculumService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogRepository>, progress: Arc<ProgressService>) -> Self {
        Self { catalog, progress }
    }

    /// # Errors
    ///
    /// Returns `CurriculumError::Storage` if the catalog cannot be read.
    pub async fn levels(&self) -> Result<Vec<Level>, CurriculumError> {
        Ok(self.catalog.list_levels().await?)
    }

    /// Lesson content, completion state and neighbours. `Ok(None)` for an
    /// unknown id.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError::Storage` if the catalog cannot be read.
    pub async fn lesson(&self, id: &LessonId) -> Result<Option<LessonView>, CurriculumError> {
        let Some(entry) = self.catalog.get_lesson(id).await? else {
            return Ok(None);
        };
        let neighbours = self
            .neighbours(id)
            .await?
            .unwrap_or(Neighbours {
                previous: None,
                next: None,
            });
        let state = self.progress.lesson_state(id).await;
        Ok(Some(LessonView {
            entry,
            state,
            neighbours,
        }))
    }

    /// # Errors
    ///
    /// Returns `CurriculumError::Storage` if the catalog cannot be read.
    pub async fn neighbours(&self, id: &LessonId) -> Result<Option<Neighbours>, CurriculumError> {
        let catalog = self.catalog.snapshot().await?;
        let ordered = navigation::ordered_lessons(&catalog);
        Ok(navigation::adjacent(&ordered, id).map(|adj| Neighbours {
            previous: adj.previous.map(LessonSummary::from),
            next: adj.next.map(LessonSummary::from),
        }))
    }

    /// # Errors
    ///
    /// Returns `CurriculumError::Storage` if the catalog cannot be read.
    pub async fn level_progress(&self) -> Result<Vec<LevelProgress>, CurriculumError> {
        let catalog = self.catalog.snapshot().await?;
        let completed = self.progress.completed().await;
        Ok(progress::catalog_progress(&catalog, &completed))
    }

    /// # Errors
    ///
    /// Returns `CurriculumError::UnknownModule` if the module is not in the
    /// catalog.
    pub async fn module_progress(&self, id: &ModuleId) -> Result<ModuleProgress, CurriculumError> {
        let catalog = self.catalog.snapshot().await?;
        let (_, module) = catalog
            .module(id)
            .ok_or_else(|| CurriculumError::UnknownModule(id.clone()))?;
        let completed = self.progress.completed().await;
        Ok(progress::module_progress(module, &completed))
    }

    /// # Errors
    ///
    /// Returns `CurriculumError::Storage` if the catalog cannot be read.
    pub async fn overall_stats(&self) -> Result<OverallStats, CurriculumError> {
        let catalog = self.catalog.snapshot().await?;
        let completed = self.progress.completed().await;
        Ok(progress::overall_stats(&catalog, &completed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fusha_core::model::UserId;
    use fusha_core::time::fixed_clock;
    use storage::{InMemoryCatalog, InMemoryRepository, ProgressStore};

    fn services() -> (Arc<ProgressService>, CurriculumService) {
        let catalog: Arc<dyn CatalogRepository> =
            Arc::new(InMemoryCatalog::builtin().unwrap());
        let store = ProgressStore::new(Arc::new(InMemoryRepository::new()), fixed_clock());
        let progress = Arc::new(ProgressService::new(
            Arc::new(store),
            Arc::clone(&catalog),
            UserId::new("u1"),
        ));
        let curriculum = CurriculumService::new(catalog, Arc::clone(&progress));
        (progress, curriculum)
    }

    #[tokio::test]
    async fn neighbours_cross_module_boundary() {
        let (_, curriculum) = services();
        let n = curriculum
            .neighbours(&LessonId::new("a1-m2-l1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(n.previous.unwrap().id, LessonId::new("a1-m1-l4"));
        assert_eq!(n.next.unwrap().id, LessonId::new("a1-m2-l2"));
    }

    #[tokio::test]
    async fn first_and_last_lessons_have_open_ends() {
        let (_, curriculum) = services();
        let first = curriculum
            .lesson(&LessonId::new("a1-m1-l1"))
            .await
            .unwrap()
            .unwrap();
        assert!(first.neighbours.previous.is_none());

        let last = curriculum
            .neighbours(&LessonId::new("a2-m2-l2"))
            .await
            .unwrap()
            .unwrap();
        assert!(last.next.is_none());
    }

    #[tokio::test]
    async fn unknown_lesson_yields_none() {
        let (_, curriculum) = services();
        assert!(curriculum
            .lesson(&LessonId::new("missing"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn module_completion_tracks_store() {
        let (progress, curriculum) = services();
        let module = ModuleId::new("a1-m3");

        for id in ["a1-m3-l1", "a1-m3-l2"] {
            progress.complete_lesson(&LessonId::new(id)).await.unwrap();
        }
        let partial = curriculum.module_progress(&module).await.unwrap();
        assert_eq!((partial.completed_count, partial.total_count), (2, 3));
        assert_eq!(partial.percentage, 67);

        progress
            .complete_lesson(&LessonId::new("a1-m3-l3"))
            .await
            .unwrap();
        assert!(curriculum.module_progress(&module).await.unwrap().is_complete);
    }

    #[tokio::test]
    async fn level_completes_with_last_lesson_and_resets() {
        let (progress, curriculum) = services();
        let catalog = InMemoryCatalog::builtin().unwrap();
        let a1 = catalog.catalog().level_by_code("A1").unwrap().clone();
        for module in &a1.modules {
            for lesson in &module.lessons {
                progress.complete_lesson(&lesson.id).await.unwrap();
            }
        }

        let stats = curriculum.overall_stats().await.unwrap();
        assert_eq!(stats.completed_levels, 1);
        assert_eq!(stats.completed_modules, 3);
        assert_eq!(stats.completed_lessons, 11);
        let levels = curriculum.level_progress().await.unwrap();
        assert!(levels[0].is_complete);
        assert!(!levels[1].is_complete);

        progress.reset().await;
        assert_eq!(curriculum.overall_stats().await.unwrap().completed_lessons, 0);
    }

    #[tokio::test]
    async fn unknown_module_is_an_error() {
        let (_, curriculum) = services();
        assert!(matches!(
            curriculum.module_progress(&ModuleId::new("zz")).await,
            Err(CurriculumError::UnknownModule(_))
        ));
    }
}
