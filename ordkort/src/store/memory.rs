//! In-process store for dev mode and tests.

use async_trait::async_trait;
use bytes::Bytes;
use lesson::{
    ContentDraft, ContentItem, Illustration, LearnerProfile, LeveledText, Task, TaskResult,
    Translation, WeeklyTest,
};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ObjectStore, RecordStore, Result};

#[derive(Default)]
struct Tables {
    content_items: Vec<ContentItem>,
    profiles: Vec<LearnerProfile>,
    translations: Vec<Translation>,
    leveled_texts: Vec<LeveledText>,
    tasks: Vec<Task>,
    task_results: Vec<TaskResult>,
    weekly_tests: Vec<WeeklyTest>,
}

/// An uploaded object.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Tables and bucket held behind async locks.
///
/// Every trait method takes the lock once, so replace-sets and the
/// content upsert are atomic here.
pub struct MemoryStore {
    bucket: String,
    tables: RwLock<Tables>,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            tables: RwLock::new(Tables::default()),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Public URL of an object in this store.
    pub fn public_url(&self, path: &str) -> String {
        format!("memory://{}/{}", self.bucket, path)
    }

    pub async fn add_profile(&self, profile: LearnerProfile) {
        self.tables.write().await.profiles.push(profile);
    }

    /// Insert a content item as-is, bypassing the upsert.
    pub async fn insert_content_item(&self, item: ContentItem) {
        self.tables.write().await.content_items.push(item);
    }

    pub async fn content_items(&self) -> Vec<ContentItem> {
        self.tables.read().await.content_items.clone()
    }

    pub async fn task_results(&self) -> Vec<TaskResult> {
        self.tables.read().await.task_results.clone()
    }

    pub async fn weekly_tests(&self) -> Vec<WeeklyTest> {
        self.tables.read().await.weekly_tests.clone()
    }

    pub async fn object(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().await.get(path).cloned()
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("generated")
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn upsert_content_item(&self, draft: &ContentDraft) -> Result<ContentItem> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables
            .content_items
            .iter_mut()
            .find(|item| item.classroom_id == draft.classroom_id && item.date == draft.date)
        {
            existing.word = draft.word.clone();
            existing.theme = draft.theme.clone();
            existing.approved = draft.approved;
            return Ok(existing.clone());
        }

        let item = ContentItem {
            id: Uuid::new_v4(),
            classroom_id: draft.classroom_id,
            date: draft.date,
            word: draft.word.clone(),
            theme: draft.theme.clone(),
            image_url: None,
            image_alt: None,
            approved: draft.approved,
        };
        tables.content_items.push(item.clone());
        Ok(item)
    }

    async fn content_item(&self, id: Uuid) -> Result<Option<ContentItem>> {
        let tables = self.tables.read().await;
        Ok(tables.content_items.iter().find(|item| item.id == id).cloned())
    }

    async fn set_illustration(&self, id: Uuid, illustration: &Illustration) -> Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(item) = tables.content_items.iter_mut().find(|item| item.id == id) {
            item.image_url = Some(illustration.url.clone());
            item.image_alt = Some(illustration.alt.clone());
        }
        Ok(())
    }

    async fn approve_content_item(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.content_items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.approved = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn recent_approved(&self, classroom_id: Uuid, limit: usize) -> Result<Vec<ContentItem>> {
        let tables = self.tables.read().await;
        let mut items: Vec<ContentItem> = tables
            .content_items
            .iter()
            .filter(|item| item.classroom_id == classroom_id && item.approved)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.date.cmp(&a.date));
        items.truncate(limit);
        Ok(items)
    }

    async fn learner_profiles(&self, classroom_id: Uuid) -> Result<Vec<LearnerProfile>> {
        let tables = self.tables.read().await;
        Ok(tables
            .profiles
            .iter()
            .filter(|p| p.classroom_id == Some(classroom_id))
            .cloned()
            .collect())
    }

    async fn replace_translation(&self, translation: &Translation) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.translations.retain(|t| {
            t.content_id != translation.content_id
                || t.language_code != translation.language_code
        });
        tables.translations.push(translation.clone());
        Ok(())
    }

    async fn translations(&self, content_id: Uuid) -> Result<Vec<Translation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .translations
            .iter()
            .filter(|t| t.content_id == content_id)
            .cloned()
            .collect())
    }

    async fn replace_leveled_texts(&self, content_id: Uuid, texts: &[LeveledText]) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.leveled_texts.retain(|t| t.content_id != content_id);
        tables.leveled_texts.extend_from_slice(texts);
        Ok(())
    }

    async fn leveled_texts(&self, content_id: Uuid) -> Result<Vec<LeveledText>> {
        let tables = self.tables.read().await;
        Ok(tables
            .leveled_texts
            .iter()
            .filter(|t| t.content_id == content_id)
            .cloned()
            .collect())
    }

    async fn replace_tasks(&self, content_id: Uuid, tasks: &[Task]) -> Result<Vec<Task>> {
        let stored: Vec<Task> = tasks
            .iter()
            .cloned()
            .map(|mut task| {
                task.id = Some(Uuid::new_v4());
                task
            })
            .collect();

        let mut tables = self.tables.write().await;
        tables.tasks.retain(|t| t.content_id != content_id);
        tables.tasks.extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn tasks(&self, content_id: Uuid) -> Result<Vec<Task>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .iter()
            .filter(|t| t.content_id == content_id)
            .cloned()
            .collect())
    }

    async fn task(&self, id: Uuid) -> Result<Option<Task>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.iter().find(|t| t.id == Some(id)).cloned())
    }

    async fn insert_task_result(&self, result: &TaskResult) -> Result<()> {
        self.tables.write().await.task_results.push(result.clone());
        Ok(())
    }

    async fn insert_weekly_test(&self, test: &WeeklyTest) -> Result<()> {
        self.tables.write().await.weekly_tests.push(test.clone());
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn upload(&self, path: &str, bytes: Bytes, content_type: &str) -> Result<String> {
        self.objects.write().await.insert(
            path.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(self.public_url(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(raw: &str) -> NaiveDate {
        lesson::parse_date(raw).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_item_per_classroom_date() {
        let store = MemoryStore::default();
        let classroom = Uuid::new_v4();

        let first = store
            .upsert_content_item(&ContentDraft::new(classroom, date("2026-10-18"), "hus", None))
            .await
            .unwrap();
        store.approve_content_item(first.id).await.unwrap();

        let second = store
            .upsert_content_item(&ContentDraft::new(
                classroom,
                date("2026-10-18"),
                "bok",
                Some("skole".into()),
            ))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        let items = store.content_items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].word, "bok");
        assert_eq!(items[0].theme.as_deref(), Some("skole"));
        assert!(!items[0].approved);
    }

    #[tokio::test]
    async fn test_recent_approved_newest_first() {
        let store = MemoryStore::default();
        let classroom = Uuid::new_v4();
        for (day, approved) in [("2026-10-12", true), ("2026-10-14", false), ("2026-10-16", true)] {
            let item = store
                .upsert_content_item(&ContentDraft::new(classroom, date(day), day, None))
                .await
                .unwrap();
            if approved {
                store.approve_content_item(item.id).await.unwrap();
            }
        }

        let recent = store.recent_approved(classroom, 5).await.unwrap();
        let dates: Vec<String> = recent.iter().map(|i| i.date.to_string()).collect();
        assert_eq!(dates, vec!["2026-10-16", "2026-10-12"]);

        assert!(store.recent_approved(Uuid::new_v4(), 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_approve_unknown_item() {
        let store = MemoryStore::default();
        assert!(!store.approve_content_item(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_replace_translation_per_language() {
        let store = MemoryStore::default();
        let content_id = Uuid::new_v4();
        let translation = |code: &str, text: &str| Translation {
            content_id,
            language_code: code.into(),
            text: text.into(),
        };

        store.replace_translation(&translation("ar", "old")).await.unwrap();
        store.replace_translation(&translation("so", "guri")).await.unwrap();
        store.replace_translation(&translation("ar", "new")).await.unwrap();

        let mut rows = store.translations(content_id).await.unwrap();
        rows.sort_by(|a, b| a.language_code.cmp(&b.language_code));
        assert_eq!(rows, vec![translation("ar", "new"), translation("so", "guri")]);
    }

    #[tokio::test]
    async fn test_upload_returns_public_url() {
        let store = MemoryStore::new("generated");
        let url = store
            .upload("dailyword-1.svg", Bytes::from_static(b"<svg/>"), "image/svg+xml")
            .await
            .unwrap();

        assert_eq!(url, "memory://generated/dailyword-1.svg");
        let object = store.object("dailyword-1.svg").await.unwrap();
        assert_eq!(object.content_type, "image/svg+xml");
        assert_eq!(&object.bytes[..], b"<svg/>");
    }
}
