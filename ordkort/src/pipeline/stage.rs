//! Provider selection per pipeline stage.

use ordkort_agent::{ImageGenerator, LlmBackend, Translator};
use std::sync::Arc;

/// How a stage runs for one pipeline run, chosen once on entry.
pub enum Stage<'a, P: ?Sized> {
    /// Call the provider; any provider error still ends in the fallback
    Remote(&'a P),
    /// Deterministic output, no provider call
    Fallback,
}

impl<'a, P: ?Sized> Stage<'a, P> {
    /// Remote only when a provider is configured and the run is not a demo.
    pub fn select(provider: Option<&'a P>, demo: bool) -> Self {
        match provider {
            Some(provider) if !demo => Self::Remote(provider),
            _ => Self::Fallback,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// External providers available to the pipeline. A missing provider
/// selects the fallback for its stage.
#[derive(Clone, Default)]
pub struct Providers {
    pub translator: Option<Arc<dyn Translator>>,
    pub images: Option<Arc<dyn ImageGenerator>>,
    pub text: Option<Arc<dyn LlmBackend>>,
}

impl Providers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn with_images(mut self, images: Arc<dyn ImageGenerator>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn with_text(mut self, text: Arc<dyn LlmBackend>) -> Self {
        self.text = Some(text);
        self
    }

    /// Names of the configured providers, for the startup log.
    pub fn configured(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.translator.is_some() {
            names.push("translation");
        }
        if self.images.is_some() {
            names.push("images");
        }
        if self.text.is_some() {
            names.push("text");
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordkort_agent::MockTranslator;

    #[test]
    fn test_select() {
        let translator = MockTranslator::new();
        let provider: Option<&dyn Translator> = Some(&translator);

        assert!(Stage::select(provider, false).is_remote());
        assert!(!Stage::select(provider, true).is_remote());
        assert!(!Stage::<dyn Translator>::select(None, false).is_remote());
    }

    #[test]
    fn test_configured_names() {
        let providers = Providers::none().with_translator(Arc::new(MockTranslator::new()));
        assert_eq!(providers.configured(), vec!["translation"]);
        assert!(Providers::none().configured().is_empty());
    }
}
