//! Core types for daily word lessons.
//!
//! Field names follow the backend's table columns (`daily_words`,
//! `translations`, `level_texts`, `tasks`, `profiles`, `task_results`,
//! `weekly_tests`) so rows round-trip through the REST API unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LessonError;

/// Proficiency level of a leveled text or task.
///
/// Serialized as the bare integer `1`, `2` or `3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Level {
    One = 1,
    Two = 2,
    Three = 3,
}

impl Level {
    /// All levels in ascending order
    pub const ALL: [Level; 3] = [Level::One, Level::Two, Level::Three];

    pub fn number(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for Level {
    type Error = LessonError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Level::One),
            2 => Ok(Level::Two),
            3 => Ok(Level::Three),
            other => Err(LessonError::InvalidLevel(other)),
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.number()
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// The daily word of one classroom on one date.
///
/// At most one exists per `(classroom_id, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: Uuid,
    pub classroom_id: Uuid,
    pub date: NaiveDate,
    /// Target word or theme text
    #[serde(rename = "norwegian")]
    pub word: String,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_alt: Option<String>,
    #[serde(default)]
    pub approved: bool,
}

/// What a teacher submits: the upsert payload for a content item.
///
/// `approved` is always written as `false` so a regenerated word has to be
/// approved again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDraft {
    pub classroom_id: Uuid,
    pub date: NaiveDate,
    #[serde(rename = "norwegian")]
    pub word: String,
    pub theme: Option<String>,
    pub approved: bool,
}

impl ContentDraft {
    pub fn new(
        classroom_id: Uuid,
        date: NaiveDate,
        word: impl Into<String>,
        theme: Option<String>,
    ) -> Self {
        Self {
            classroom_id,
            date,
            word: word.into(),
            theme,
            approved: false,
        }
    }
}

/// Translation of a content item into one learner first language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(rename = "dailyword_id")]
    pub content_id: Uuid,
    pub language_code: String,
    pub text: String,
}

/// Reading text for one level of a content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeveledText {
    #[serde(rename = "dailyword_id")]
    pub content_id: Uuid,
    pub level: Level,
    pub text: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_alt: Option<String>,
}

/// Kind of interactive task, stored in the `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Pick the correct option by index
    Mcq,
    /// Pick the word missing from a sentence
    FillBlank,
    /// Pick the word completing a sentence
    SentenceComplete,
    /// Pick every option that belongs with the word
    WordAssociation,
}

/// Question payload of a task (`data` column).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Machine-checkable answer (`answer` column).
///
/// The JSON shape depends on the task kind:
/// `{"index": 2}`, `{"correct": "eple"}` or `{"correct": ["eple", "mat"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerKey {
    Index { index: usize },
    Correct { correct: String },
    CorrectSet { correct: Vec<String> },
}

/// An interactive task tied to a content item and a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Row ID, assigned by the store on insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(rename = "dailyword_id")]
    pub content_id: Uuid,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub level: Level,
    #[serde(default)]
    pub prompt: Option<String>,
    pub data: TaskData,
    pub answer: AnswerKey,
}

/// Learner profile, read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerProfile {
    pub id: Uuid,
    #[serde(default)]
    pub classroom_id: Option<Uuid>,
    /// First-language code, e.g. `"ar"`
    #[serde(default)]
    pub l1: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty_level: u8,
}

fn default_difficulty() -> u8 {
    1
}

/// A learner's scored answer to one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub task_id: Uuid,
    pub learner_id: Uuid,
    pub response: serde_json::Value,
    pub score: u8,
}

/// One single-choice question of a weekly test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTask {
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub prompt: String,
    pub data: TaskData,
    pub answer: AnswerKey,
}

/// Weekly test built from the latest approved words of a classroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTest {
    pub classroom_id: Uuid,
    pub iso_week: u32,
    pub date: NaiveDate,
    pub tasks: Vec<WeeklyTask>,
    pub auto_grade: bool,
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, LessonError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| LessonError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Level::Two).unwrap(), "2");
        let level: Level = serde_json::from_str("3").unwrap();
        assert_eq!(level, Level::Three);
        assert!(serde_json::from_str::<Level>("4").is_err());
    }

    #[test]
    fn test_answer_key_shapes() {
        let index: AnswerKey = serde_json::from_str(r#"{"index": 2}"#).unwrap();
        assert_eq!(index, AnswerKey::Index { index: 2 });

        let single: AnswerKey = serde_json::from_str(r#"{"correct": "eple"}"#).unwrap();
        assert_eq!(single, AnswerKey::Correct { correct: "eple".into() });

        let set: AnswerKey = serde_json::from_str(r#"{"correct": ["eple", "frukt"]}"#).unwrap();
        assert_eq!(
            set,
            AnswerKey::CorrectSet {
                correct: vec!["eple".into(), "frukt".into()]
            }
        );
    }

    #[test]
    fn test_content_item_uses_column_names() {
        let json = serde_json::json!({
            "id": "7f1d1c5e-8f3a-4c0e-9f57-2a7b8f0c1d11",
            "classroom_id": "0b6a3f0e-1d2c-4b5a-8e9f-001122334455",
            "date": "2026-03-02",
            "norwegian": "eple",
            "approved": true,
            "created_at": "2026-03-02T08:00:00Z"
        });

        let item: ContentItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.word, "eple");
        assert!(item.approved);
        assert!(item.theme.is_none());
    }

    #[test]
    fn test_task_without_id_skips_field() {
        let task = Task {
            id: None,
            content_id: Uuid::nil(),
            kind: TaskKind::FillBlank,
            level: Level::One,
            prompt: None,
            data: TaskData::default(),
            answer: AnswerKey::Correct { correct: "eple".into() },
        };

        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["type"], "fill_blank");
        assert_eq!(value["dailyword_id"], Uuid::nil().to_string());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2026-03-02").unwrap(), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert!(matches!(parse_date("02.03.2026"), Err(LessonError::InvalidDate(_))));
    }
}
