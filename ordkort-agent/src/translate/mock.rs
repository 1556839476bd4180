//! In-process translator for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use super::{TranslateError, Translator};

/// Returns `"{text} ({target})"` unless a fixed answer is registered for
/// the target language. Targets listed with `failing` return an error.
#[derive(Default)]
pub struct MockTranslator {
    answers: HashMap<String, String>,
    failing: Vec<String>,
    call_count: AtomicU32,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(mut self, target: impl Into<String>, text: impl Into<String>) -> Self {
        self.answers.insert(target.into(), text.into());
        self
    }

    pub fn failing(mut self, target: impl Into<String>) -> Self {
        self.failing.push(target.into());
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source: &str,
        target: &str,
    ) -> Result<String, TranslateError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.failing.iter().any(|t| t == target) {
            return Err(TranslateError::Unavailable(format!("mock failure for {}", target)));
        }

        Ok(self
            .answers
            .get(target)
            .cloned()
            .unwrap_or_else(|| format!("{} ({})", text, target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_translator() {
        let translator = MockTranslator::new().with_answer("en", "house").failing("ar");

        assert_eq!(translator.translate("hus", "no", "en").await.unwrap(), "house");
        assert_eq!(translator.translate("hus", "no", "uk").await.unwrap(), "hus (uk)");
        assert!(translator.translate("hus", "no", "ar").await.is_err());
        assert_eq!(translator.call_count(), 3);
    }
}
