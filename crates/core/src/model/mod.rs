pub mod catalog;
mod ids;
mod record;

pub use catalog::{
    Catalog, CatalogError, ExampleSentence, Exercise, ExerciseKind, Lesson, LessonLocation,
    Level, Module, VocabularyItem,
};
pub use ids::{LessonId, LevelId, ModuleId, ParseIdError, PhraseId, UserId};
pub use record::{LessonState, ProgressRecord};
