//! Fetches pre-recorded pronunciation audio from public object storage.
//!
//! Audio is optional: every failure degrades to [`AudioLoad::Unavailable`] so
//! the caller can disable the play control.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use fusha_core::audio::{AudioCatalog, AudioKey};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::error::AudioError;

pub const DEFAULT_AUDIO_BUCKET: &str = "lesson-audio";
pub const DEFAULT_AUDIO_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct AudioConfig {
    pub base_url: Url,
    pub bucket: String,
    pub timeout: Duration,
}

impl AudioConfig {
    /// # Errors
    ///
    /// Returns `AudioError::InvalidBaseUrl` if `base_url` does not parse.
    pub fn new(
        base_url: &str,
        bucket: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AudioError> {
        Ok(Self {
            base_url: Url::parse(base_url.trim())?,
            bucket: bucket.into(),
            timeout,
        })
    }

    /// Public URL of an object: `<base>/storage/v1/object/public/<bucket>/<key>`.
    #[must_use]
    pub fn object_url(&self, object_key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.bucket,
            object_key.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub key: AudioKey,
    pub object_key: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub enum AudioLoad {
    Ready(AudioClip),
    Unavailable(AudioError),
    /// A later `load` call started before this one finished.
    Superseded,
}

impl AudioLoad {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

pub struct AudioService {
    client: Client,
    config: Option<AudioConfig>,
    mapping: AudioCatalog,
    latest: AtomicU64,
}

impl AudioService {
    /// # Errors
    ///
    /// Returns `AudioError::Http` if the HTTP client cannot be built.
    pub fn new(config: Option<AudioConfig>, mapping: AudioCatalog) -> Result<Self, AudioError> {
        let timeout = config.as_ref().map_or(DEFAULT_AUDIO_TIMEOUT, |c| c.timeout);
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            config,
            mapping,
            latest: AtomicU64::new(0),
        })
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Whether a play control for `key` should be offered at all.
    #[must_use]
    pub fn has_recording(&self, key: &AudioKey) -> bool {
        self.enabled() && self.mapping.object_key(key).is_some()
    }

    /// Load a recording. Starting a new load supersedes any load still in
    /// flight; the older call then returns [`AudioLoad::Superseded`].
    pub async fn load(&self, key: &AudioKey) -> AudioLoad {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.fetch(key).await;

        if self.latest.load(Ordering::SeqCst) != ticket {
            debug!(%key, "audio load superseded");
            return AudioLoad::Superseded;
        }

        match result {
            Ok(clip) => AudioLoad::Ready(clip),
            Err(err) => {
                warn!(%key, error = %err, "audio unavailable");
                AudioLoad::Unavailable(err)
            }
        }
    }

    async fn fetch(&self, key: &AudioKey) -> Result<AudioClip, AudioError> {
        let config = self.config.as_ref().ok_or(AudioError::Disabled)?;
        let object_key = self
            .mapping
            .object_key(key)
            .ok_or_else(|| AudioError::NotMapped(key.to_string()))?
            .to_string();

        let response = self
            .client
            .get(config.object_url(&object_key))
            .send()
            .await
            .map_err(classify)?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(AudioError::NotFound(object_key)),
            // Some object stores answer 400 for a missing public object.
            StatusCode::BAD_REQUEST => return Err(AudioError::NotFound(object_key)),
            status => return Err(AudioError::HttpStatus(status)),
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await.map_err(classify)?.to_vec();

        Ok(AudioClip {
            key: key.clone(),
            object_key,
            content_type,
            bytes,
        })
    }
}

fn classify(err: reqwest::Error) -> AudioError {
    if err.is_timeout() {
        AudioError::Timeout
    } else {
        AudioError::Http(err)
    }
}
