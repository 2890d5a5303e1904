use crate::model::{Catalog, Lesson, LessonId, Level, Module};

/// A lesson with the sort keys that place it in the global sequence.
#[derive(Debug, Clone, Copy)]
pub struct LessonRef<'a> {
    pub level_position: usize,
    pub level: &'a Level,
    pub module: &'a Module,
    pub lesson: &'a Lesson,
}

impl LessonRef<'_> {
    fn sort_key(&self) -> (usize, u32, u32) {
        (self.level_position, self.module.number, self.lesson.order)
    }
}

/// Lessons immediately before and after a given lesson.
#[derive(Debug, Clone, Copy)]
pub struct Adjacent<'a> {
    pub previous: Option<LessonRef<'a>>,
    pub next: Option<LessonRef<'a>>,
}

/// All lessons sorted by level, then module number, then in-module order.
#[must_use]
pub fn ordered_lessons(catalog: &Catalog) -> Vec<LessonRef<'_>> {
    let mut lessons: Vec<LessonRef<'_>> = catalog
        .levels()
        .iter()
        .enumerate()
        .flat_map(|(level_position, level)| {
            level.modules.iter().flat_map(move |module| {
                module.lessons.iter().map(move |lesson| LessonRef {
                    level_position,
                    level,
                    module,
                    lesson,
                })
            })
        })
        .collect();
    lessons.sort_by_key(|r| r.sort_key());
    lessons
}

/// Returns `None` when `current` is not in the sequence.
#[must_use]
pub fn adjacent<'a>(ordered: &[LessonRef<'a>], current: &LessonId) -> Option<Adjacent<'a>> {
    let idx = ordered.iter().position(|r| &r.lesson.id == current)?;
    Some(Adjacent {
        previous: idx.checked_sub(1).map(|i| ordered[i]),
        next: ordered.get(idx + 1).copied(),
    })
}
