use std::sync::Arc;

use fusha_core::audio::AudioCatalog;
use fusha_core::model::UserId;
use storage::{InMemoryCatalog, ProgressStore, Storage, ensure_user_id};
use tracing::info;

use crate::audio_service::{AudioConfig, AudioService};
use crate::curriculum_service::CurriculumService;
use crate::error::AppServicesError;
use crate::grammar_service::GrammarReferenceService;
use crate::progress_service::ProgressService;
use crate::Clock;

/// Assembles app-facing services over one storage handle.
#[derive(Clone)]
pub struct AppServices {
    storage: Storage,
    progress: Arc<ProgressService>,
    curriculum: Arc<CurriculumService>,
    grammar: Arc<GrammarReferenceService>,
    audio: Arc<AudioService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the built-in curriculum.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the curriculum is invalid, the database
    /// cannot be opened, or the audio client cannot be built.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        audio: Option<AudioConfig>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url, InMemoryCatalog::builtin()?).await?;
        Self::from_storage(storage, clock, audio).await
    }

    /// Build services over in-memory storage and the built-in curriculum.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the curriculum is invalid or the audio
    /// client cannot be built.
    pub async fn in_memory(clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::in_memory(InMemoryCatalog::builtin()?);
        Self::from_storage(storage, clock, None).await
    }

    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog cannot be read or the audio
    /// client cannot be built.
    pub async fn from_storage(
        storage: Storage,
        clock: Clock,
        audio: Option<AudioConfig>,
    ) -> Result<Self, AppServicesError> {
        let user = ensure_user_id(storage.kv.as_ref()).await;
        info!(user_id = %user, "services starting");

        let store = Arc::new(ProgressStore::new(Arc::clone(&storage.kv), clock));
        let progress = Arc::new(ProgressService::new(
            store,
            Arc::clone(&storage.catalog),
            user,
        ));
        let curriculum = Arc::new(CurriculumService::new(
            Arc::clone(&storage.catalog),
            Arc::clone(&progress),
        ));
        let grammar = Arc::new(GrammarReferenceService::new(Arc::clone(&progress)));

        let catalog = storage.catalog.snapshot().await?;
        let audio = Arc::new(AudioService::new(
            audio,
            AudioCatalog::from_catalog(&catalog),
        )?);

        Ok(Self {
            storage,
            progress,
            curriculum,
            grammar,
            audio,
        })
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        self.progress.user_id()
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn curriculum(&self) -> Arc<CurriculumService> {
        Arc::clone(&self.curriculum)
    }

    #[must_use]
    pub fn grammar(&self) -> Arc<GrammarReferenceService> {
        Arc::clone(&self.grammar)
    }

    #[must_use]
    pub fn audio(&self) -> Arc<AudioService> {
        Arc::clone(&self.audio)
    }

    /// Close the storage backend. Call once before exit.
    pub async fn shutdown(&self) {
        self.storage.close().await;
        info!("storage closed");
    }
}
