#![forbid(unsafe_code)]

pub mod catalog;
pub mod progress;
pub mod repository;
pub mod sqlite;
pub mod user;

pub use catalog::{CatalogLoadError, InMemoryCatalog};
pub use progress::{PROGRESS_KEY, ProgressStore};
pub use repository::{
    CatalogRepository, InMemoryRepository, KeyValueStore, LessonEntry, Storage, StorageError,
};
pub use user::{USER_ID_KEY, ensure_user_id};
