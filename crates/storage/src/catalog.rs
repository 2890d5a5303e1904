//! Static curriculum, embedded at build time.

use std::sync::Arc;

use async_trait::async_trait;
use fusha_core::model::{Catalog, CatalogError, LessonId, Level};
use serde::Deserialize;
use thiserror::Error;

use crate::repository::{CatalogRepository, LessonEntry, StorageError};

const BUILTIN_CURRICULUM: &str = include_str!("../data/curriculum.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogLoadError {
    #[error("curriculum data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] CatalogError),
}

#[derive(Deserialize)]
struct CurriculumData {
    levels: Vec<Level>,
}

/// `CatalogRepository` over a catalog held in memory.
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    catalog: Arc<Catalog>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Load the curriculum shipped with the application.
    ///
    /// # Errors
    ///
    /// Returns `CatalogLoadError` if the embedded data fails to parse or
    /// violates catalog invariants.
    pub fn builtin() -> Result<Self, CatalogLoadError> {
        Self::from_json(BUILTIN_CURRICULUM)
    }

    /// Parse a curriculum document of the form `{"levels": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogLoadError` on malformed JSON or invalid structure.
    pub fn from_json(raw: &str) -> Result<Self, CatalogLoadError> {
        let data: CurriculumData = serde_json::from_str(raw)?;
        Ok(Self::new(Catalog::new(data.levels)?))
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn list_levels(&self) -> Result<Vec<Level>, StorageError> {
        Ok(self.catalog.levels().to_vec())
    }

    async fn get_level(&self, code: &str) -> Result<Option<Level>, StorageError> {
        Ok(self.catalog.level_by_code(code).cloned())
    }

    async fn get_lesson(&self, id: &LessonId) -> Result<Option<LessonEntry>, StorageError> {
        Ok(self.catalog.find_lesson(id).map(|loc| LessonEntry {
            level_id: loc.level.id.clone(),
            level_code: loc.level.code.clone(),
            module_id: loc.module.id.clone(),
            module_title: loc.module.title.clone(),
            lesson: loc.lesson.clone(),
        }))
    }

    async fn snapshot(&self) -> Result<Arc<Catalog>, StorageError> {
        Ok(Arc::clone(&self.catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fusha_core::gate::gate_lesson;
    use fusha_core::model::ModuleId;

    #[test]
    fn builtin_curriculum_loads() {
        let catalog = InMemoryCatalog::builtin().unwrap();
        let codes: Vec<_> = catalog
            .catalog()
            .levels()
            .iter()
            .map(|l| l.code.as_str())
            .collect();
        assert_eq!(codes, ["A1", "A2"]);
        assert!(catalog.catalog().contains_lesson(&gate_lesson()));
    }

    #[tokio::test]
    async fn lesson_lookup_carries_owners() {
        let repo = InMemoryCatalog::builtin().unwrap();
        let entry = repo
            .get_lesson(&LessonId::new("a1-m2-l1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.level_code, "A1");
        assert_eq!(entry.module_id, ModuleId::new("a1-m2"));
        assert_eq!(entry.lesson.title, "Greetings");
    }

    #[tokio::test]
    async fn unknown_lesson_is_none() {
        let repo = InMemoryCatalog::builtin().unwrap();
        assert!(repo
            .get_lesson(&LessonId::new("z9-m9-l9"))
            .await
            .unwrap()
            .is_none());
        assert!(repo.get_level("C2").await.unwrap().is_none());
    }

    #[test]
    fn duplicate_codes_fail_to_load() {
        let raw = r#"{"levels": [
            {"id": "a", "code": "A1", "title": "One"},
            {"id": "b", "code": "A1", "title": "Two"}
        ]}"#;
        assert!(matches!(
            InMemoryCatalog::from_json(raw),
            Err(CatalogLoadError::Invalid(CatalogError::DuplicateLevelCode(_)))
        ));
    }

    #[test]
    fn malformed_json_fails_to_load() {
        assert!(matches!(
            InMemoryCatalog::from_json("{"),
            Err(CatalogLoadError::Parse(_))
        ));
    }
}
