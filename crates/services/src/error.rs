//! Shared error types for the services crate.

use thiserror::Error;

use fusha_core::model::{LessonId, ModuleId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use storage::CatalogLoadError;

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error("unknown lesson: {0}")]
    UnknownLesson(LessonId),
    #[error("failed to export progress: {0}")]
    Export(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CurriculumService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CurriculumError {
    #[error("unknown module: {0}")]
    UnknownModule(ModuleId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Reasons an audio clip cannot be played.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AudioError {
    #[error("audio is not configured")]
    Disabled,
    #[error("no recording mapped for {0}")]
    NotMapped(String),
    #[error("recording not found: {0}")]
    NotFound(String),
    #[error("audio request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("audio request timed out")]
    Timeout,
    #[error("invalid audio base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Catalog(#[from] CatalogLoadError),
    #[error(transparent)]
    Audio(#[from] AudioError),
}
