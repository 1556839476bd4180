//! Configuration for Ordkort
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use ordkort_agent::image::FLUX_SCHNELL_URL;
use ordkort_agent::{
    HuggingFaceImages, LibreTranslate, LlmError, OpenAiBackend, OPENROUTER_BASE_URL,
};

use crate::pipeline::{PipelineConfig, Providers};

/// Ordkort - daily word content service
#[derive(Parser, Debug, Clone)]
#[command(name = "ordkort")]
#[command(about = "Generates translations, illustrations, texts and tasks for daily classroom words")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8787")]
    pub listen: SocketAddr,

    /// Hosted backend base URL (REST + storage)
    /// When unset, records and objects are kept in memory (dev mode)
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Backend anon key, sent as the `apikey` header
    #[arg(long, env = "BACKEND_ANON_KEY")]
    pub backend_anon_key: Option<String>,

    /// Object-store bucket for illustrations
    #[arg(long, env = "STORAGE_BUCKET", default_value = "generated")]
    pub storage_bucket: String,

    /// LibreTranslate base URL (translation is skipped when unset)
    #[arg(long, env = "LIBRETRANSLATE_BASE_URL")]
    pub libretranslate_base_url: Option<String>,

    /// LibreTranslate API key, for instances that require one
    #[arg(long, env = "LIBRETRANSLATE_API_KEY")]
    pub libretranslate_api_key: Option<String>,

    /// Hugging Face API token (image generation is skipped when unset)
    #[arg(long, env = "HUGGINGFACE_API_TOKEN")]
    pub huggingface_api_token: Option<String>,

    /// Image model inference endpoint
    #[arg(long, env = "IMAGE_MODEL_URL", default_value = FLUX_SCHNELL_URL)]
    pub image_model_url: String,

    /// OpenRouter API key (text generation is skipped when unset)
    #[arg(long, env = "OPENROUTER_API_KEY")]
    pub openrouter_api_key: Option<String>,

    /// OpenAI-compatible base URL for text generation
    #[arg(long, env = "TEXT_BASE_URL", default_value = OPENROUTER_BASE_URL)]
    pub text_base_url: String,

    /// Text generation model id
    #[arg(long, env = "TEXT_MODEL", default_value = "meta-llama/llama-3.1-8b-instruct:free")]
    pub text_model: String,

    /// Language the daily words are written in
    #[arg(long, env = "SOURCE_LANGUAGE", default_value = "no")]
    pub source_language: String,

    /// Treat every generation request as a demo run
    #[arg(long, env = "FORCE_DEMO", default_value = "false")]
    pub force_demo: bool,

    /// Fixed seed for task generation (random per run when unset)
    #[arg(long, env = "TASK_SEED")]
    pub task_seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format (pretty, json)
    #[arg(long, env = "LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Backend request timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub request_timeout_ms: u64,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.backend_anon_key.is_some() && self.backend_url.is_none() {
            return Err("BACKEND_ANON_KEY is set but BACKEND_URL is missing".to_string());
        }

        if !matches!(self.log_format.as_str(), "pretty" | "json") {
            return Err(format!(
                "LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                self.log_format
            ));
        }

        if self.request_timeout_ms == 0 {
            return Err("REQUEST_TIMEOUT_MS must be greater than zero".to_string());
        }

        Ok(())
    }

    /// Whether records live in memory instead of the hosted backend
    pub fn dev_mode(&self) -> bool {
        self.backend_url.is_none()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Pipeline settings, read once at startup.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            source_language: self.source_language.clone(),
            force_demo: self.force_demo,
            task_seed: self.task_seed,
        }
    }

    /// Build a client for every provider that has credentials configured.
    pub fn providers(&self) -> Result<Providers, LlmError> {
        let mut providers = Providers::none();

        if let Some(base_url) = non_empty(&self.libretranslate_base_url) {
            let mut translator = LibreTranslate::new(base_url);
            if let Some(key) = non_empty(&self.libretranslate_api_key) {
                translator = translator.with_api_key(key);
            }
            providers = providers.with_translator(Arc::new(translator));
        }

        if let Some(token) = non_empty(&self.huggingface_api_token) {
            providers = providers.with_images(Arc::new(HuggingFaceImages::with_client(
                reqwest::Client::new(),
                self.image_model_url.clone(),
                token,
            )));
        }

        if let Some(key) = non_empty(&self.openrouter_api_key) {
            providers = providers.with_text(Arc::new(OpenAiBackend::new(
                self.text_base_url.clone(),
                self.text_model.clone(),
                Some(key.to_string()),
            )?));
        }

        Ok(providers)
    }
}

/// Empty environment values count as unset.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["ordkort"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.listen.port(), 8787);
        assert_eq!(args.storage_bucket, "generated");
        assert_eq!(args.source_language, "no");
        assert!(args.dev_mode());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_anon_key_requires_backend_url() {
        let args = parse(&["--backend-anon-key", "anon"]);
        assert!(args.validate().is_err());

        let args = parse(&[
            "--backend-anon-key",
            "anon",
            "--backend-url",
            "http://localhost:54321",
        ]);
        assert!(args.validate().is_ok());
        assert!(!args.dev_mode());
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let args = parse(&["--log-format", "xml"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_providers_follow_credentials() {
        let args = parse(&[
            "--libretranslate-base-url",
            "http://lt:5000",
            "--openrouter-api-key",
            " ",
        ]);
        let providers = args.providers().unwrap();
        assert!(providers.translator.is_some());
        assert!(providers.images.is_none());
        assert!(providers.text.is_none());
    }

    #[tokio::test]
    async fn test_translator_sends_api_key() {
        use ordkort_agent::Translator;
        use wiremock::matchers::{body_partial_json, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .and(body_partial_json(serde_json::json!({ "api_key": "lt-key" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "translatedText": "house" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let args = parse(&[
            "--libretranslate-base-url",
            &uri,
            "--libretranslate-api-key",
            "lt-key",
        ]);
        let providers = args.providers().unwrap();
        let translator = providers.translator.unwrap();
        assert_eq!(translator.translate("hus", "no", "en").await.unwrap(), "house");
    }

    #[test]
    fn test_pipeline_config() {
        let args = parse(&["--force-demo", "--task-seed", "42"]);
        let config = args.pipeline_config();
        assert!(config.force_demo);
        assert_eq!(config.task_seed, Some(42));
    }
}
