use async_trait::async_trait;
use fusha_core::model::{Catalog, Lesson, LessonId, Level, LevelId, ModuleId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::catalog::InMemoryCatalog;
use crate::sqlite::SqliteRepository;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// String key/value storage, the native counterpart of browser local storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the delete.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Owned copy of a lesson with the identity of its module and level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonEntry {
    pub level_id: LevelId,
    pub level_code: String,
    pub module_id: ModuleId,
    pub module_title: String,
    pub lesson: Lesson,
}

/// Read-only access to the curriculum.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All levels in declaration order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing source cannot be read.
    async fn list_levels(&self) -> Result<Vec<Level>, StorageError>;

    /// Fetch a level by its short code (`A1`, `A2`, ...).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing source cannot be read.
    async fn get_level(&self, code: &str) -> Result<Option<Level>, StorageError>;

    /// Fetch a lesson by id. Unknown ids yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing source cannot be read.
    async fn get_lesson(&self, id: &LessonId) -> Result<Option<LessonEntry>, StorageError>;

    /// Whole catalog, for rollup and navigation.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing source cannot be read.
    async fn snapshot(&self) -> Result<Arc<Catalog>, StorageError>;
}

/// In-memory key/value store for tests and prototyping.
///
/// Reads and writes can be switched to fail so callers' fail-soft paths can
/// be exercised.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    values: Arc<Mutex<HashMap<String, String>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Seed a raw value without going through the failure switches.
    ///
    /// # Panics
    ///
    /// Panics if the inner lock is poisoned.
    pub fn put_raw(&self, key: &str, value: &str) {
        self.values
            .lock()
            .expect("in-memory store lock poisoned")
            .insert(key.to_string(), value.to_string());
    }

    fn check_writes(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("writes disabled".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("reads disabled".into()));
        }
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writes()?;
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_writes()?;
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Storage handles the services are built from.
///
/// Opened once at startup and closed with [`Storage::close`].
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
    pub catalog: Arc<dyn CatalogRepository>,
    sqlite: Option<SqliteRepository>,
}

impl Storage {
    /// In-memory key/value store with the given catalog.
    #[must_use]
    pub fn in_memory(catalog: InMemoryCatalog) -> Self {
        Self::from_parts(Arc::new(InMemoryRepository::new()), Arc::new(catalog))
    }

    #[must_use]
    pub fn from_parts(kv: Arc<dyn KeyValueStore>, catalog: Arc<dyn CatalogRepository>) -> Self {
        Self {
            kv,
            catalog,
            sqlite: None,
        }
    }

    pub(crate) fn with_sqlite(
        repo: SqliteRepository,
        catalog: Arc<dyn CatalogRepository>,
    ) -> Self {
        let kv: Arc<dyn KeyValueStore> = Arc::new(repo.clone());
        Self {
            kv,
            catalog,
            sqlite: Some(repo),
        }
    }

    /// Flush and release the backing database, if any.
    pub async fn close(&self) {
        if let Some(repo) = &self.sqlite {
            repo.close().await;
        }
    }
}
