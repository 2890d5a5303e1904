//! Completion rollup: lesson → module → level → overall.
//!
//! Everything here is a pure function of the catalog and a snapshot of the
//! completed-lesson set. Nothing is cached; callers recompute from the store
//! on every query so the figures can never drift from persisted progress.

use std::collections::BTreeSet;

use crate::model::{Catalog, LessonId, Level, LevelId, Module, ModuleId};

/// Completion figures for a single module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleProgress {
    pub module_id: ModuleId,
    pub completed_count: usize,
    pub total_count: usize,
    /// Rounded to the nearest whole percent, 0 for an empty module.
    pub percentage: u8,
    pub is_complete: bool,
}

/// Completion figures for a level and each of its modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelProgress {
    pub level_id: LevelId,
    pub code: String,
    pub modules: Vec<ModuleProgress>,
    pub is_complete: bool,
}

impl LevelProgress {
    #[must_use]
    pub fn completed_modules(&self) -> usize {
        self.modules.iter().filter(|m| m.is_complete).count()
    }
}

/// Aggregate counts across the whole catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverallStats {
    pub completed_levels: usize,
    pub completed_modules: usize,
    pub completed_lessons: usize,
    pub total_levels: usize,
    pub total_modules: usize,
    pub total_lessons: usize,
}

#[must_use]
pub fn module_progress(module: &Module, completed: &BTreeSet<LessonId>) -> ModuleProgress {
    let total_count = module.lessons.len();
    let completed_count = module
        .lessons
        .iter()
        .filter(|lesson| completed.contains(&lesson.id))
        .count();

    ModuleProgress {
        module_id: module.id.clone(),
        completed_count,
        total_count,
        percentage: percentage(completed_count, total_count),
        is_complete: completed_count == total_count,
    }
}

/// A level is complete unless one of its modules is not.
///
/// The scan stops at the first incomplete module. A level without modules
/// never trips that check and so reports complete.
#[must_use]
pub fn level_is_complete(level: &Level, completed: &BTreeSet<LessonId>) -> bool {
    for module in &level.modules {
        if !module_progress(module, completed).is_complete {
            return false;
        }
    }
    true
}

#[must_use]
pub fn level_progress(level: &Level, completed: &BTreeSet<LessonId>) -> LevelProgress {
    let modules: Vec<ModuleProgress> = level
        .modules
        .iter()
        .map(|module| module_progress(module, completed))
        .collect();

    LevelProgress {
        level_id: level.id.clone(),
        code: level.code.clone(),
        is_complete: level_is_complete(level, completed),
        modules,
    }
}

#[must_use]
pub fn catalog_progress(catalog: &Catalog, completed: &BTreeSet<LessonId>) -> Vec<LevelProgress> {
    catalog
        .levels()
        .iter()
        .map(|level| level_progress(level, completed))
        .collect()
}

#[must_use]
pub fn overall_stats(catalog: &Catalog, completed: &BTreeSet<LessonId>) -> OverallStats {
    let mut stats = OverallStats::default();

    for level in catalog.levels() {
        stats.total_levels += 1;
        if level_is_complete(level, completed) {
            stats.completed_levels += 1;
        }

        for module in &level.modules {
            let progress = module_progress(module, completed);
            stats.total_modules += 1;
            stats.total_lessons += progress.total_count;
            stats.completed_lessons += progress.completed_count;
            if progress.is_complete {
                stats.completed_modules += 1;
            }
        }
    }

    stats
}

fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // Half-up rounding in integer arithmetic: round(c / t * 100).
    let pct = (completed * 200 + total) / (total * 2);
    u8::try_from(pct.min(100)).unwrap_or(100)
}
