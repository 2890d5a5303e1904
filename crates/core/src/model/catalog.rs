use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{LessonId, LevelId, ModuleId, PhraseId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("duplicate level code: {0}")]
    DuplicateLevelCode(String),

    #[error("duplicate level id: {0}")]
    DuplicateLevelId(LevelId),

    #[error("duplicate module id: {0}")]
    DuplicateModuleId(ModuleId),

    #[error("duplicate lesson id: {0}")]
    DuplicateLessonId(LessonId),

    #[error("blank title for {0}")]
    BlankTitle(String),
}

//
// ─── CONTENT TYPES ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub arabic: String,
    pub transliteration: String,
    pub meaning: String,
    #[serde(default)]
    pub audio: Option<PhraseId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleSentence {
    pub arabic: String,
    pub transliteration: String,
    pub translation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    MultipleChoice,
    FillInBlank,
    Translation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub kind: ExerciseKind,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: String,
}

impl Exercise {
    /// Compares a learner's answer, ignoring surrounding whitespace.
    #[must_use]
    pub fn is_correct(&self, given: &str) -> bool {
        self.answer.trim() == given.trim()
    }
}

//
// ─── HIERARCHY ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    /// Position within the owning module.
    pub order: u32,
    pub title: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub grammar: String,
    #[serde(default)]
    pub vocabulary: Vec<VocabularyItem>,
    #[serde(default)]
    pub examples: Vec<ExampleSentence>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub number: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// "Can-do" goal shown to the learner.
    #[serde(default)]
    pub can_do: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    /// Short CEFR-style code, e.g. `A1`.
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub modules: Vec<Module>,
}

/// A lesson together with the module and level that own it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonLocation<'a> {
    pub level: &'a Level,
    pub module: &'a Module,
    pub lesson: &'a Lesson,
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Read-only Level → Module → Lesson hierarchy.
///
/// Declaration order of levels, modules and lessons is preserved and defines
/// navigation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    levels: Vec<Level>,
}

impl Catalog {
    /// Build a catalog, checking identity invariants.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on duplicate level codes or ids, duplicate module
    /// or lesson ids, or blank titles.
    pub fn new(levels: Vec<Level>) -> Result<Self, CatalogError> {
        let mut codes = HashSet::new();
        let mut level_ids = HashSet::new();
        let mut module_ids = HashSet::new();
        let mut lesson_ids = HashSet::new();

        for level in &levels {
            if !codes.insert(level.code.to_ascii_uppercase()) {
                return Err(CatalogError::DuplicateLevelCode(level.code.clone()));
            }
            if !level_ids.insert(&level.id) {
                return Err(CatalogError::DuplicateLevelId(level.id.clone()));
            }
            ensure_title(&level.title, || format!("level {}", level.id))?;

            for module in &level.modules {
                if !module_ids.insert(&module.id) {
                    return Err(CatalogError::DuplicateModuleId(module.id.clone()));
                }
                ensure_title(&module.title, || format!("module {}", module.id))?;

                for lesson in &module.lessons {
                    if !lesson_ids.insert(&lesson.id) {
                        return Err(CatalogError::DuplicateLessonId(lesson.id.clone()));
                    }
                    ensure_title(&lesson.title, || format!("lesson {}", lesson.id))?;
                }
            }
        }

        Ok(Self { levels })
    }

    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    #[must_use]
    pub fn level_by_code(&self, code: &str) -> Option<&Level> {
        self.levels
            .iter()
            .find(|level| level.code.eq_ignore_ascii_case(code))
    }

    #[must_use]
    pub fn module(&self, id: &ModuleId) -> Option<(&Level, &Module)> {
        self.levels.iter().find_map(|level| {
            level
                .modules
                .iter()
                .find(|module| &module.id == id)
                .map(|module| (level, module))
        })
    }

    /// Finds a lesson and its owners. Returns `None` for unknown ids.
    #[must_use]
    pub fn find_lesson(&self, id: &LessonId) -> Option<LessonLocation<'_>> {
        self.locations().find(|loc| &loc.lesson.id == id)
    }

    #[must_use]
    pub fn contains_lesson(&self, id: &LessonId) -> bool {
        self.find_lesson(id).is_some()
    }

    /// Every lesson in declaration order.
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> + '_ {
        self.locations().map(|loc| loc.lesson)
    }

    pub fn locations(&self) -> impl Iterator<Item = LessonLocation<'_>> + '_ {
        self.levels.iter().flat_map(|level| {
            level.modules.iter().flat_map(move |module| {
                module
                    .lessons
                    .iter()
                    .map(move |lesson| LessonLocation {
                        level,
                        module,
                        lesson,
                    })
            })
        })
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.levels
            .iter()
            .flat_map(|level| &level.modules)
            .map(|module| module.lessons.len())
            .sum()
    }
}

fn ensure_title(title: &str, what: impl FnOnce() -> String) -> Result<(), CatalogError> {
    if title.trim().is_empty() {
        return Err(CatalogError::BlankTitle(what()));
    }
    Ok(())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
