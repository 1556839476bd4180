//! Word translation providers.

mod libre;
mod mock;

pub use libre::LibreTranslate;
pub use mock::MockTranslator;

use async_trait::async_trait;

/// Errors raised by a translation provider.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Translation failed: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    /// The provider answered but returned no usable text
    #[error("Empty translation")]
    Empty,

    #[error("Translator unavailable: {0}")]
    Unavailable(String),
}

/// Translates a short text from one language to another.
///
/// Language codes are passed through unchanged (`"no"`, `"uk"`, `"ar"`, ...).
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str)
        -> Result<String, TranslateError>;
}
