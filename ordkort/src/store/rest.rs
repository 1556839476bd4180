//! REST client for the hosted backend.
//!
//! Tables are reached through a PostgREST-style API under `/rest/v1`, the
//! illustration bucket through the storage API under `/storage/v1`.

use async_trait::async_trait;
use bytes::Bytes;
use lesson::{
    ContentDraft, ContentItem, Illustration, LearnerProfile, LeveledText, Task, TaskResult,
    Translation, WeeklyTest,
};
use reqwest::{header, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use super::{ObjectStore, RecordStore, Result, StoreError};

const PREFER_REPRESENTATION: &str = "return=representation";
const PREFER_UPSERT: &str = "resolution=merge-duplicates,return=representation";

/// Connection settings for [`RestBackend`].
#[derive(Debug, Clone)]
pub struct RestConfig {
    pub base_url: String,
    pub anon_key: Option<String>,
    pub bucket: String,
    pub timeout: Duration,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            anon_key: None,
            bucket: "generated".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Hosted backend client, optionally acting for one caller.
#[derive(Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    anon_key: Option<String>,
    bucket: String,
    authorization: Option<String>,
}

impl RestBackend {
    pub fn new(config: RestConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key,
            bucket: config.bucket,
            authorization: None,
        })
    }

    /// Copy of this client that forwards the caller's `Authorization`
    /// header. Without one, the anon key is used as bearer token.
    pub fn with_authorization(&self, authorization: Option<&str>) -> Self {
        Self {
            authorization: authorization
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
            ..self.clone()
        }
    }

    /// Public URL of an object in the illustration bucket.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            self.bucket,
            urlencoding::encode(path)
        )
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            urlencoding::encode(path)
        )
    }

    fn bearer(&self) -> Option<String> {
        self.authorization
            .clone()
            .or_else(|| self.anon_key.as_ref().map(|key| format!("Bearer {}", key)))
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let mut request = self.client.request(method, url);
        if let Some(ref key) = self.anon_key {
            request = request.header("apikey", key);
        }
        if let Some(bearer) = self.bearer() {
            request = request.header(header::AUTHORIZATION, bearer);
        }
        request
    }

    fn table(&self, method: Method, table: &str) -> RequestBuilder {
        self.request(method, self.table_url(table))
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        let body = response.json().await?;
        Ok(body)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Server {
                status,
                message: body,
            });
        }

        Ok(response)
    }

    /// Delete rows matching `filters`.
    async fn delete_where(&self, table: &str, filters: &[(&str, String)]) -> Result<()> {
        let response = self.table(Method::DELETE, table).query(filters).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Insert rows without reading them back.
    async fn insert<B: serde::Serialize + ?Sized>(&self, table: &str, body: &B) -> Result<()> {
        let response = self
            .table(Method::POST, table)
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let response = self.table(Method::GET, table).query(filters).send().await?;
        self.handle_response(response).await
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

#[async_trait]
impl RecordStore for RestBackend {
    async fn upsert_content_item(&self, draft: &ContentDraft) -> Result<ContentItem> {
        let response = self
            .table(Method::POST, "daily_words")
            .query(&[("on_conflict", "classroom_id,date")])
            .header("Prefer", PREFER_UPSERT)
            .json(&[draft])
            .send()
            .await?;

        let rows: Vec<ContentItem> = self.handle_response(response).await?;
        let item = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::InvalidResponse("upsert returned no row".to_string()))?;

        debug!(
            content_id = %item.id,
            classroom_id = %item.classroom_id,
            date = %item.date,
            "Content item upserted"
        );
        Ok(item)
    }

    async fn content_item(&self, id: Uuid) -> Result<Option<ContentItem>> {
        let rows: Vec<ContentItem> = self.select("daily_words", &[("id", eq(id))]).await?;
        Ok(rows.into_iter().next())
    }

    async fn set_illustration(&self, id: Uuid, illustration: &Illustration) -> Result<()> {
        let response = self
            .table(Method::PATCH, "daily_words")
            .query(&[("id", eq(id))])
            .json(&serde_json::json!({
                "image_url": illustration.url,
                "image_alt": illustration.alt,
            }))
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn approve_content_item(&self, id: Uuid) -> Result<bool> {
        let response = self
            .table(Method::PATCH, "daily_words")
            .query(&[("id", eq(id))])
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&serde_json::json!({ "approved": true }))
            .send()
            .await?;

        let rows: Vec<ContentItem> = self.handle_response(response).await?;
        Ok(!rows.is_empty())
    }

    async fn recent_approved(&self, classroom_id: Uuid, limit: usize) -> Result<Vec<ContentItem>> {
        self.select(
            "daily_words",
            &[
                ("classroom_id", eq(classroom_id)),
                ("approved", eq(true)),
                ("order", "date.desc".to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn learner_profiles(&self, classroom_id: Uuid) -> Result<Vec<LearnerProfile>> {
        self.select(
            "profiles",
            &[
                ("classroom_id", eq(classroom_id)),
                ("select", "id,classroom_id,l1,difficulty_level".to_string()),
            ],
        )
        .await
    }

    async fn replace_translation(&self, translation: &Translation) -> Result<()> {
        self.delete_where(
            "translations",
            &[
                ("dailyword_id", eq(translation.content_id)),
                ("language_code", eq(&translation.language_code)),
            ],
        )
        .await?;
        self.insert("translations", &[translation]).await
    }

    async fn translations(&self, content_id: Uuid) -> Result<Vec<Translation>> {
        self.select("translations", &[("dailyword_id", eq(content_id))]).await
    }

    async fn replace_leveled_texts(&self, content_id: Uuid, texts: &[LeveledText]) -> Result<()> {
        self.delete_where("level_texts", &[("dailyword_id", eq(content_id))]).await?;
        self.insert("level_texts", texts).await
    }

    async fn leveled_texts(&self, content_id: Uuid) -> Result<Vec<LeveledText>> {
        self.select(
            "level_texts",
            &[("dailyword_id", eq(content_id)), ("order", "level.asc".to_string())],
        )
        .await
    }

    async fn replace_tasks(&self, content_id: Uuid, tasks: &[Task]) -> Result<Vec<Task>> {
        self.delete_where("tasks", &[("dailyword_id", eq(content_id))]).await?;

        let response = self
            .table(Method::POST, "tasks")
            .header("Prefer", PREFER_REPRESENTATION)
            .json(tasks)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn tasks(&self, content_id: Uuid) -> Result<Vec<Task>> {
        self.select(
            "tasks",
            &[("dailyword_id", eq(content_id)), ("order", "level.asc".to_string())],
        )
        .await
    }

    async fn task(&self, id: Uuid) -> Result<Option<Task>> {
        let rows: Vec<Task> = self.select("tasks", &[("id", eq(id))]).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_task_result(&self, result: &TaskResult) -> Result<()> {
        self.insert("task_results", &[result]).await
    }

    async fn insert_weekly_test(&self, test: &WeeklyTest) -> Result<()> {
        self.insert("weekly_tests", &[test]).await
    }
}

#[async_trait]
impl ObjectStore for RestBackend {
    async fn upload(&self, path: &str, bytes: Bytes, content_type: &str) -> Result<String> {
        let size = bytes.len();
        let response = self
            .request(Method::POST, self.object_url(path))
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;
        Self::check_status(response).await?;

        debug!(path, size, content_type, "Object uploaded");
        Ok(self.public_url(path))
    }
}
