//! Mapping from lesson/phrase identity to pre-recorded audio objects.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::model::{Catalog, LessonId, PhraseId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceRole {
    Male,
    Female,
}

impl VoiceRole {
    pub const ALL: [VoiceRole; 2] = [VoiceRole::Male, VoiceRole::Female];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for VoiceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoiceRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(format!("unknown voice role: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AudioSubject {
    Lesson(LessonId),
    Phrase(PhraseId),
}

/// Composite lookup key: what is spoken, and by which voice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioKey {
    pub subject: AudioSubject,
    pub voice: VoiceRole,
}

impl AudioKey {
    #[must_use]
    pub fn lesson(id: LessonId, voice: VoiceRole) -> Self {
        Self {
            subject: AudioSubject::Lesson(id),
            voice,
        }
    }

    #[must_use]
    pub fn phrase(id: PhraseId, voice: VoiceRole) -> Self {
        Self {
            subject: AudioSubject::Phrase(id),
            voice,
        }
    }
}

impl fmt::Display for AudioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            AudioSubject::Lesson(id) => write!(f, "lesson:{id}/{}", self.voice),
            AudioSubject::Phrase(id) => write!(f, "phrase:{id}/{}", self.voice),
        }
    }
}

/// Explicit dictionary from `AudioKey` to object-storage key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioCatalog {
    entries: HashMap<AudioKey, String>,
}

impl AudioCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every lesson and every vocabulary phrase with audio, in both
    /// voices.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut audio = Self::new();
        for lesson in catalog.lessons() {
            for voice in VoiceRole::ALL {
                audio.insert(
                    AudioKey::lesson(lesson.id.clone(), voice),
                    format!("lessons/{}/{voice}.mp3", lesson.id),
                );
            }
            for phrase in lesson.vocabulary.iter().filter_map(|v| v.audio.as_ref()) {
                for voice in VoiceRole::ALL {
                    audio.insert(
                        AudioKey::phrase(phrase.clone(), voice),
                        format!("phrases/{phrase}/{voice}.mp3"),
                    );
                }
            }
        }
        audio
    }

    pub fn insert(&mut self, key: AudioKey, object_key: impl Into<String>) {
        self.entries.insert(key, object_key.into());
    }

    #[must_use]
    pub fn object_key(&self, key: &AudioKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
