#![forbid(unsafe_code)]

pub mod app_services;
pub mod audio_service;
pub mod curriculum_service;
pub mod error;
pub mod grammar_service;
pub mod progress_service;

pub use fusha_core::Clock;

pub use app_services::AppServices;
pub use audio_service::{AudioClip, AudioConfig, AudioLoad, AudioService};
pub use curriculum_service::{CurriculumService, LessonSummary, LessonView, Neighbours};
pub use error::{AppServicesError, AudioError, CurriculumError, ProgressServiceError};
pub use grammar_service::{GrammarReferenceService, GrammarTableView};
pub use progress_service::ProgressService;
