//! Backend storage
//!
//! Two seams to the hosted backend:
//!
//! - [`RecordStore`]: the relational tables (`daily_words`, `translations`,
//!   `level_texts`, `tasks`, `profiles`, `task_results`, `weekly_tests`)
//! - [`ObjectStore`]: the illustration bucket
//!
//! [`MemoryStore`] keeps everything in process for dev mode and tests;
//! [`RestBackend`] talks to a PostgREST-style REST API and its storage API.

mod memory;
mod rest;

pub use memory::{MemoryStore, StoredObject};
pub use rest::{RestBackend, RestConfig};

use async_trait::async_trait;
use bytes::Bytes;
use lesson::{
    ContentDraft, ContentItem, Illustration, LearnerProfile, LeveledText, Task, TaskResult,
    Translation, WeeklyTest,
};
use std::sync::Arc;
use uuid::Uuid;

/// Storage error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend returned an error status
    #[error("Backend error {status}: {message}")]
    Server { status: u16, message: String },

    /// Backend answered with something we cannot use
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Relational tables used by the daily content pipeline and the function routes.
///
/// `replace_*` methods swap out every row of one key. The REST backend does
/// this as a delete followed by an insert, so a failure in between leaves the
/// key empty until the next run.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert or update the item keyed by `(classroom_id, date)` in one
    /// statement. Updates overwrite word and theme and reset approval.
    async fn upsert_content_item(&self, draft: &ContentDraft) -> Result<ContentItem>;

    async fn content_item(&self, id: Uuid) -> Result<Option<ContentItem>>;

    async fn set_illustration(&self, id: Uuid, illustration: &Illustration) -> Result<()>;

    /// Mark an item approved. Returns `false` if no item has that id.
    async fn approve_content_item(&self, id: Uuid) -> Result<bool>;

    /// Approved items of a classroom, newest date first.
    async fn recent_approved(&self, classroom_id: Uuid, limit: usize) -> Result<Vec<ContentItem>>;

    async fn learner_profiles(&self, classroom_id: Uuid) -> Result<Vec<LearnerProfile>>;

    /// Replace the translation for `(content_id, language_code)`.
    async fn replace_translation(&self, translation: &Translation) -> Result<()>;

    async fn translations(&self, content_id: Uuid) -> Result<Vec<Translation>>;

    /// Replace all leveled texts of a content item.
    async fn replace_leveled_texts(&self, content_id: Uuid, texts: &[LeveledText]) -> Result<()>;

    async fn leveled_texts(&self, content_id: Uuid) -> Result<Vec<LeveledText>>;

    /// Replace all tasks of a content item; returns the stored rows with ids.
    async fn replace_tasks(&self, content_id: Uuid, tasks: &[Task]) -> Result<Vec<Task>>;

    async fn tasks(&self, content_id: Uuid) -> Result<Vec<Task>>;

    async fn task(&self, id: Uuid) -> Result<Option<Task>>;

    async fn insert_task_result(&self, result: &TaskResult) -> Result<()>;

    async fn insert_weekly_test(&self, test: &WeeklyTest) -> Result<()>;
}

/// Illustration bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload (overwriting) an object and return its public URL.
    async fn upload(&self, path: &str, bytes: Bytes, content_type: &str) -> Result<String>;
}

/// Store handles for one request.
#[derive(Clone)]
pub struct Stores {
    pub records: Arc<dyn RecordStore>,
    pub objects: Arc<dyn ObjectStore>,
}

impl Stores {
    /// Both seams backed by the same in-memory store.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            records: store.clone(),
            objects: store,
        }
    }
}

/// Hands out store handles scoped to a caller.
#[derive(Clone)]
pub enum StoreProvider {
    /// Shared in-process tables (dev mode)
    Memory(Arc<MemoryStore>),
    /// Hosted backend; each caller's token is forwarded
    Rest(RestBackend),
}

impl StoreProvider {
    /// Stores acting on behalf of the caller's `Authorization` header, so
    /// the backend applies that caller's row-level rules.
    pub fn for_caller(&self, authorization: Option<&str>) -> Stores {
        match self {
            Self::Memory(store) => Stores::memory(store.clone()),
            Self::Rest(backend) => {
                let scoped = Arc::new(backend.with_authorization(authorization));
                Stores {
                    records: scoped.clone(),
                    objects: scoped,
                }
            }
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Rest(_) => "backend",
        }
    }
}
