use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{LessonId, UserId};

/// Durable fact that a user completed a lesson.
///
/// Serialized as `{"lessonId", "userIdentifier", "completedAt"}` with an
/// RFC 3339 timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub lesson_id: LessonId,
    #[serde(rename = "userIdentifier")]
    pub user_id: UserId,
    pub completed_at: DateTime<Utc>,
}

impl ProgressRecord {
    #[must_use]
    pub fn new(lesson_id: LessonId, user_id: UserId, completed_at: DateTime<Utc>) -> Self {
        Self {
            lesson_id,
            user_id,
            completed_at,
        }
    }

    #[must_use]
    pub fn matches(&self, lesson_id: &LessonId, user_id: &UserId) -> bool {
        &self.lesson_id == lesson_id && &self.user_id == user_id
    }
}

/// Per-user lesson state. The only transition is `NotCompleted -> Completed`;
/// going back requires a full progress reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonState {
    NotCompleted,
    Completed,
}

impl LessonState {
    #[must_use]
    pub fn from_completed(completed: bool) -> Self {
        if completed {
            Self::Completed
        } else {
            Self::NotCompleted
        }
    }

    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn record_uses_storage_field_names() {
        let record = ProgressRecord::new(LessonId::new("a1-m1-l1"), UserId::new("u1"), fixed_now());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["lessonId"], "a1-m1-l1");
        assert_eq!(json["userIdentifier"], "u1");
        assert_eq!(json["completedAt"], "2023-11-14T22:13:20Z");
    }

    #[test]
    fn record_parses_iso_timestamp_with_millis() {
        let raw = r#"{"lessonId":"x","userIdentifier":"u","completedAt":"2024-03-01T10:15:30.123Z"}"#;
        let record: ProgressRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.lesson_id, LessonId::new("x"));
        assert_eq!(record.completed_at.timestamp_subsec_millis(), 123);
    }
}
