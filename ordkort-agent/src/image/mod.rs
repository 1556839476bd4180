//! Illustration providers.

mod huggingface;
mod mock;

pub use huggingface::{HuggingFaceImages, FLUX_SCHNELL_URL};
pub use mock::MockImages;

use async_trait::async_trait;
use bytes::Bytes;

/// Errors raised by an image provider.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Image request failed: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Image response was empty")]
    Empty,

    #[error("Image provider unavailable: {0}")]
    Unavailable(String),
}

/// Raw image bytes plus the content type the provider reported.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Turns a text prompt into an image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageError>;
}
