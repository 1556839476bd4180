//! Weekly test generation.

use chrono::NaiveDate;
use lesson::{build_weekly_test, WeeklyTest, WEEKLY_TEST_SIZE};
use tracing::info;
use uuid::Uuid;

use crate::store::{RecordStore, Result};

/// Build a weekly test from the classroom's latest approved words and store it.
///
/// A classroom without approved words still gets a test, with no tasks.
pub async fn generate_weekly_test(
    records: &dyn RecordStore,
    classroom_id: Uuid,
    today: NaiveDate,
) -> Result<WeeklyTest> {
    let items = records.recent_approved(classroom_id, WEEKLY_TEST_SIZE).await?;
    let test = build_weekly_test(classroom_id, &items, today);
    records.insert_weekly_test(&test).await?;

    info!(
        %classroom_id,
        iso_week = test.iso_week,
        tasks = test.tasks.len(),
        "Weekly test generated"
    );
    Ok(test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use lesson::{AnswerKey, ContentItem};

    fn item(classroom_id: Uuid, date: &str, word: &str, approved: bool) -> ContentItem {
        ContentItem {
            id: Uuid::new_v4(),
            classroom_id,
            date: lesson::parse_date(date).unwrap(),
            word: word.to_string(),
            theme: None,
            image_url: None,
            image_alt: None,
            approved,
        }
    }

    #[tokio::test]
    async fn test_uses_five_latest_approved() {
        let store = MemoryStore::default();
        let classroom = Uuid::new_v4();
        for (i, word) in ["en", "to", "tre", "fire", "fem", "seks", "sju"].iter().enumerate() {
            store
                .insert_content_item(item(classroom, &format!("2026-10-{:02}", i + 10), word, true))
                .await;
        }
        store.insert_content_item(item(classroom, "2026-10-18", "utkast", false)).await;
        store.insert_content_item(item(Uuid::new_v4(), "2026-10-17", "annen", true)).await;

        let today = lesson::parse_date("2026-10-18").unwrap();
        let test = generate_weekly_test(&store, classroom, today).await.unwrap();

        let words: Vec<&str> = test.tasks.iter().map(|t| t.data.options[0].as_str()).collect();
        assert_eq!(words, vec!["sju", "seks", "fem", "fire", "tre"]);
        assert_eq!(test.iso_week, 42);
        assert!(test.auto_grade);
        assert!(test.tasks.iter().all(|t| t.answer == AnswerKey::Index { index: 0 }));
        assert_eq!(store.weekly_tests().await, vec![test]);
    }

    #[tokio::test]
    async fn test_empty_classroom() {
        let store = MemoryStore::default();
        let today = lesson::parse_date("2026-10-18").unwrap();
        let test = generate_weekly_test(&store, Uuid::new_v4(), today).await.unwrap();
        assert!(test.tasks.is_empty());
        assert_eq!(store.weekly_tests().await.len(), 1);
    }
}
