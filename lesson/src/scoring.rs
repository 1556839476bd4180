//! Binary scoring of learner responses.
//!
//! A response is the JSON the learner's client submits, with the chosen
//! answer under `selected`: an option index for `mcq`, a string for
//! `fill_blank` and `sentence_complete`, a list of strings for
//! `word_association`.

use std::collections::HashSet;

use serde_json::Value;

use crate::types::{AnswerKey, TaskKind};

/// Score a response against a task's answer key: 1 if correct, else 0.
///
/// A response or answer key of the wrong shape for the task kind scores 0.
pub fn score(kind: TaskKind, answer: &AnswerKey, response: &Value) -> u8 {
    let selected = match response.get("selected") {
        Some(value) => value,
        None => return 0,
    };

    let correct = match (kind, answer) {
        (TaskKind::Mcq, AnswerKey::Index { index }) => {
            selected.as_u64().map(|s| s == *index as u64).unwrap_or(false)
        }
        (TaskKind::FillBlank | TaskKind::SentenceComplete, AnswerKey::Correct { correct }) => {
            selected.as_str() == Some(correct.as_str())
        }
        (TaskKind::WordAssociation, AnswerKey::CorrectSet { correct }) => {
            match selected.as_array() {
                Some(items) => {
                    let chosen: Option<HashSet<&str>> =
                        items.iter().map(Value::as_str).collect();
                    let expected: HashSet<&str> = correct.iter().map(String::as_str).collect();
                    chosen.map(|chosen| chosen == expected).unwrap_or(false)
                }
                None => false,
            }
        }
        _ => false,
    };

    u8::from(correct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mcq_compares_index() {
        let answer = AnswerKey::Index { index: 2 };
        assert_eq!(score(TaskKind::Mcq, &answer, &json!({"selected": 2})), 1);
        assert_eq!(score(TaskKind::Mcq, &answer, &json!({"selected": 0})), 0);
        assert_eq!(score(TaskKind::Mcq, &answer, &json!({"selected": "2"})), 0);
    }

    #[test]
    fn test_fill_blank_compares_string() {
        let answer = AnswerKey::Correct { correct: "eple".into() };
        assert_eq!(score(TaskKind::FillBlank, &answer, &json!({"selected": "eple"})), 1);
        assert_eq!(score(TaskKind::SentenceComplete, &answer, &json!({"selected": "mat"})), 0);
    }

    #[test]
    fn test_word_association_requires_set_equality() {
        let answer = AnswerKey::CorrectSet {
            correct: vec!["eple".into(), "frukt".into()],
        };
        let kind = TaskKind::WordAssociation;

        assert_eq!(score(kind, &answer, &json!({"selected": ["frukt", "eple"]})), 1);
        assert_eq!(score(kind, &answer, &json!({"selected": ["eple", "frukt", "eple"]})), 1);
        assert_eq!(score(kind, &answer, &json!({"selected": ["eple"]})), 0);
        assert_eq!(score(kind, &answer, &json!({"selected": ["eple", "frukt", "bil"]})), 0);
        assert_eq!(score(kind, &answer, &json!({"selected": ["eple", 3]})), 0);
    }

    #[test]
    fn test_mismatched_shapes_score_zero() {
        let answer = AnswerKey::Correct { correct: "eple".into() };
        assert_eq!(score(TaskKind::Mcq, &answer, &json!({"selected": 0})), 0);
        assert_eq!(score(TaskKind::FillBlank, &answer, &json!({})), 0);
    }
}
