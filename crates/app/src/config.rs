use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use fusha_core::audio::VoiceRole;
use fusha_core::model::LessonId;
use services::AudioConfig;
use services::audio_service::DEFAULT_AUDIO_BUCKET;

#[derive(Debug, Parser)]
#[command(name = "fusha", version, about = "Arabic curriculum browser and progress tracker")]
pub struct Cli {
    /// SQLite database holding local progress
    #[arg(long = "db", env = "FUSHA_DB_URL", default_value = "sqlite://fusha.sqlite3", global = true)]
    pub db: String,

    /// Base URL of the object store serving lesson audio
    #[arg(long, env = "FUSHA_AUDIO_BASE_URL", global = true)]
    pub audio_base_url: Option<String>,

    #[arg(long, env = "FUSHA_AUDIO_BUCKET", default_value = DEFAULT_AUDIO_BUCKET, global = true)]
    pub audio_bucket: String,

    #[arg(
        long,
        env = "FUSHA_AUDIO_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub audio_timeout_secs: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Progress per level and module (default)
    Levels,
    /// Show a lesson with its previous and next lessons
    Lesson { id: LessonId },
    /// Mark a lesson as completed
    Complete { id: LessonId },
    /// Grammar reference tables and their lock state
    Grammar,
    /// Download a pronunciation recording
    Audio {
        #[arg(value_enum)]
        kind: AudioKind,
        id: String,
        #[arg(long, default_value = "male")]
        voice: VoiceRole,
        #[arg(long)]
        out: PathBuf,
    },
    /// Delete all local progress
    Reset,
    /// Print this device's user identifier
    Whoami,
    /// Print stored progress as JSON
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AudioKind {
    Lesson,
    Phrase,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidDbUrl { raw: String },
    InvalidAudioUrl { raw: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ConfigError::InvalidAudioUrl { raw } => {
                write!(f, "invalid --audio-base-url value: {raw}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings resolved from flags and environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_url: String,
    pub audio: Option<AudioConfig>,
}

impl Cli {
    /// # Errors
    ///
    /// Returns `ConfigError` for a blank database URL or an unparseable audio
    /// base URL.
    pub fn resolve(&self) -> Result<AppConfig, ConfigError> {
        if self.db.trim().is_empty() {
            return Err(ConfigError::InvalidDbUrl {
                raw: self.db.clone(),
            });
        }

        let audio = match self.audio_base_url.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                AudioConfig::new(
                    raw,
                    self.audio_bucket.clone(),
                    Duration::from_secs(self.audio_timeout_secs),
                )
                .map_err(|_| ConfigError::InvalidAudioUrl {
                    raw: raw.to_string(),
                })?,
            ),
        };

        Ok(AppConfig {
            db_url: normalize_sqlite_url(&self.db),
            audio,
        })
    }
}

pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directory if missing.
///
/// # Errors
///
/// Returns an error if the URL has no path or the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}
