//! Weekly test assembly.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::types::{AnswerKey, ContentItem, TaskData, TaskKind, WeeklyTask, WeeklyTest};

/// Number of approved words a weekly test covers
pub const WEEKLY_TEST_SIZE: usize = 5;

const DECOYS: [&str; 2] = ["feil 1", "feil 2"];

/// ISO-8601 week number of `date`.
pub fn iso_week(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// Build a weekly test from the most recent approved items.
///
/// `items` is expected newest first; only the first [`WEEKLY_TEST_SIZE`]
/// approved ones are used. Each becomes a single-choice question with the
/// word first and two fixed decoys.
pub fn build_weekly_test(
    classroom_id: Uuid,
    items: &[ContentItem],
    today: NaiveDate,
) -> WeeklyTest {
    let tasks = items
        .iter()
        .filter(|item| item.approved)
        .take(WEEKLY_TEST_SIZE)
        .map(|item| WeeklyTask {
            kind: TaskKind::Mcq,
            prompt: format!("Hva er dagens ord {}?", item.date),
            data: TaskData {
                question: Some(format!("Velg riktig ord ({})", item.date)),
                sentence: None,
                options: std::iter::once(item.word.clone())
                    .chain(DECOYS.iter().map(|d| d.to_string()))
                    .collect(),
            },
            answer: AnswerKey::Index { index: 0 },
        })
        .collect();

    WeeklyTest {
        classroom_id,
        iso_week: iso_week(today),
        date: today,
        tasks,
        auto_grade: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(day: u32, word: &str, approved: bool) -> ContentItem {
        ContentItem {
            id: Uuid::new_v4(),
            classroom_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            word: word.to_string(),
            theme: None,
            image_url: None,
            image_alt: None,
            approved,
        }
    }

    #[test]
    fn test_iso_week_boundaries() {
        // 2021-01-03 is a Sunday that belongs to week 53 of 2020
        assert_eq!(iso_week(NaiveDate::from_ymd_opt(2021, 1, 3).unwrap()), 53);
        assert_eq!(iso_week(NaiveDate::from_ymd_opt(2021, 1, 4).unwrap()), 1);
        assert_eq!(iso_week(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()), 42);
    }

    #[test]
    fn test_weekly_test_uses_five_latest() {
        let items: Vec<ContentItem> = (1..=7)
            .rev()
            .map(|d| item(d, &format!("ord{}", d), true))
            .collect();
        let today = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();

        let test = build_weekly_test(Uuid::nil(), &items, today);

        assert_eq!(test.tasks.len(), WEEKLY_TEST_SIZE);
        assert!(test.auto_grade);
        assert_eq!(test.date, today);
        assert_eq!(test.iso_week, 11);
        assert_eq!(test.tasks[0].data.options, vec!["ord7", "feil 1", "feil 2"]);
        assert_eq!(test.tasks[0].prompt, "Hva er dagens ord 2026-03-07?");
    }

    #[test]
    fn test_weekly_answer_points_at_word() {
        let items = vec![item(2, "tog", true), item(1, "buss", false)];
        let today = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
        let test = build_weekly_test(Uuid::nil(), &items, today);

        assert_eq!(test.tasks.len(), 1);
        let task = &test.tasks[0];
        match task.answer {
            AnswerKey::Index { index } => assert_eq!(task.data.options[index], "tog"),
            ref other => panic!("unexpected answer {:?}", other),
        }
    }
}
