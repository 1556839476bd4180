//! Daily content pipeline
//!
//! Turns one teacher submission `(classroom, date, word, theme)` into the
//! full set of learner material:
//!
//! ```text
//! upsert item ─▶ learner L1 codes ─▶ translations ─▶ illustration ─▶ leveled texts ─▶ tasks
//! ```
//!
//! Each provider-backed stage picks [`Stage::Remote`] or [`Stage::Fallback`]
//! once on entry. Provider errors never fail a run; store errors do, and
//! stages that already ran stay written.

pub mod illustration;
mod stage;
pub mod tasks;
pub mod texts;
pub mod translations;

pub use illustration::IllustrationOutcome;
pub use stage::{Providers, Stage};

use chrono::NaiveDate;
use lesson::{ContentDraft, DistractorPool, ImageFormat, Illustration};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use uuid::Uuid;

use crate::store::{Result, Stores};

/// Pipeline settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Language code of the submitted words
    pub source_language: String,
    /// Treat every run as a demo run
    pub force_demo: bool,
    /// Seed for task generation; every run reuses it when set
    pub task_seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_language: "no".to_string(),
            force_demo: false,
            task_seed: None,
        }
    }
}

/// One validated submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub classroom_id: Uuid,
    pub date: NaiveDate,
    pub word: String,
    pub theme: Option<String>,
    /// Skip every provider call
    pub demo: bool,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub content_id: Uuid,
    pub languages: Vec<String>,
    pub illustration: Illustration,
    pub image_format: ImageFormat,
    pub texts_from_provider: bool,
    pub task_ids: Vec<Uuid>,
}

pub struct DailyContentPipeline {
    config: PipelineConfig,
    providers: Providers,
    pool: DistractorPool,
}

impl DailyContentPipeline {
    pub fn new(config: PipelineConfig, providers: Providers) -> Self {
        Self {
            config,
            providers,
            pool: DistractorPool::common_words(),
        }
    }

    /// Replace the distractor pool.
    pub fn with_pool(mut self, pool: DistractorPool) -> Self {
        self.pool = pool;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn providers(&self) -> &Providers {
        &self.providers
    }

    fn rng(&self) -> StdRng {
        match self.config.task_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Run every stage for one submission.
    pub async fn run(
        &self,
        stores: &Stores,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome> {
        let demo = request.demo || self.config.force_demo;
        let records = stores.records.as_ref();
        let objects = stores.objects.as_ref();

        let draft = ContentDraft::new(
            request.classroom_id,
            request.date,
            request.word.clone(),
            request.theme.clone(),
        );
        let item = records.upsert_content_item(&draft).await?;
        let content_id = item.id;
        let word = item.word.as_str();

        let profiles = records.learner_profiles(request.classroom_id).await?;
        let languages = translations::distinct_languages(&profiles);
        translations::run(
            records,
            Stage::select(self.providers.translator.as_deref(), demo),
            content_id,
            word,
            &self.config.source_language,
            &languages,
        )
        .await?;

        let illustration = illustration::run(
            records,
            objects,
            Stage::select(self.providers.images.as_deref(), demo),
            content_id,
            word,
        )
        .await?;

        let (_, texts_from_provider) = texts::run(
            records,
            Stage::select(self.providers.text.as_deref(), demo),
            content_id,
            word,
            &illustration.illustration,
        )
        .await?;

        let mut rng = self.rng();
        let stored_tasks = tasks::run(
            records,
            content_id,
            word,
            request.theme.as_deref(),
            &self.pool,
            &mut rng,
        )
        .await?;

        info!(
            %content_id,
            classroom_id = %request.classroom_id,
            date = %request.date,
            demo,
            languages = languages.len(),
            image = illustration.format.extension(),
            texts_from_provider,
            tasks = stored_tasks.len(),
            "Daily content generated"
        );

        Ok(GenerationOutcome {
            content_id,
            languages: languages.into_iter().collect(),
            illustration: illustration.illustration,
            image_format: illustration.format,
            texts_from_provider,
            task_ids: stored_tasks.iter().filter_map(|t| t.id).collect(),
        })
    }
}
