//! Leveled text stage: provider texts or templates.

use lesson::texts::parse_level_texts;
use lesson::{Illustration, LevelTextPrompt, LevelTexts, LeveledText};
use ordkort_agent::{CompletionRequest, LlmBackend};
use tracing::{debug, warn};
use uuid::Uuid;

use super::Stage;
use crate::store::{RecordStore, Result};

/// Ask the provider for three texts. `None` when the call fails or the
/// output does not parse into three texts.
pub async fn generate(backend: &dyn LlmBackend, word: &str) -> Option<LevelTexts> {
    let prompt = LevelTextPrompt::for_word(word);
    let request = CompletionRequest::user(prompt.user)
        .with_system(prompt.system)
        .with_temperature(LevelTextPrompt::TEMPERATURE)
        .with_max_tokens(LevelTextPrompt::MAX_TOKENS);

    match backend.complete(request).await {
        Ok(response) => {
            let parsed = parse_level_texts(&response.content);
            if parsed.is_none() {
                warn!(
                    stage = "texts",
                    model = backend.id(),
                    "Unusable text output, using templates"
                );
            }
            parsed
        }
        Err(e) => {
            warn!(
                stage = "texts",
                model = backend.id(),
                error = %e,
                "Text generation failed, using templates"
            );
            None
        }
    }
}

/// Replace the item's leveled texts with exactly one row per level.
pub async fn run(
    records: &dyn RecordStore,
    stage: Stage<'_, dyn LlmBackend>,
    content_id: Uuid,
    word: &str,
    illustration: &Illustration,
) -> Result<(Vec<LeveledText>, bool)> {
    let generated = match stage {
        Stage::Remote(backend) => generate(backend, word).await,
        Stage::Fallback => None,
    };
    let from_provider = generated.is_some();
    let texts = generated.unwrap_or_else(|| LevelTexts::template(word));

    let rows = texts.into_rows(content_id, word, illustration);
    records.replace_leveled_texts(content_id, &rows).await?;

    debug!(stage = "texts", %content_id, from_provider, "Stage complete");
    Ok((rows, from_provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson::Level;
    use ordkort_agent::MockBackend;

    #[tokio::test]
    async fn test_generate_parses_json_array() {
        let backend =
            MockBackend::new("mock").with_response("[\"En.\", \"To to.\", \"Tre tre tre.\"]");
        let texts = generate(&backend, "hus").await.unwrap();
        assert_eq!(texts.get(Level::Three), "Tre tre tre.");

        let request = backend.last_request().unwrap();
        assert_eq!(request.temperature, Some(LevelTextPrompt::TEMPERATURE));
        assert_eq!(request.max_tokens, Some(LevelTextPrompt::MAX_TOKENS));
        assert!(request.system_prompt.is_some());
        assert!(request.messages[0].content.contains("hus"));
    }

    #[tokio::test]
    async fn test_generate_rejects_two_lines() {
        let backend = MockBackend::new("mock").with_response("Bare en\nog to");
        assert!(generate(&backend, "hus").await.is_none());
    }

    #[tokio::test]
    async fn test_generate_unavailable() {
        let backend = MockBackend::new("mock").with_available(false);
        assert!(generate(&backend, "hus").await.is_none());
        assert_eq!(backend.call_count(), 1);
    }
}
