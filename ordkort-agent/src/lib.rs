//! Ordkort Agent - external content providers
//!
//! Each provider the daily content pipeline calls sits behind a trait so
//! the pipeline can swap in a mock, or skip the call entirely:
//!
//! - [`LlmBackend`]: text generation over an OpenAI-compatible chat API
//!   (OpenRouter by default)
//! - [`Translator`]: single-pair text translation (LibreTranslate)
//! - [`ImageGenerator`]: prompt-to-image generation (Hugging Face inference)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │          daily content pipeline          │
//! └──────┬──────────────┬──────────────┬─────┘
//!        ▼              ▼              ▼
//! ┌────────────┐ ┌────────────┐ ┌──────────────┐
//! │ LlmBackend │ │ Translator │ │ImageGenerator│
//! │ (OpenAI/   │ │ (Libre-    │ │ (Hugging     │
//! │  mock)     │ │  Translate)│ │  Face/mock)  │
//! └────────────┘ └────────────┘ └──────────────┘
//! ```
//!
//! Provider errors are never fatal to a run; callers fall back to
//! deterministic content instead.

pub mod backend;
pub mod image;
pub mod translate;

// Re-export main types for convenience
pub use backend::traits::{CompletionRequest, CompletionResponse, LlmBackend, LlmError};
pub use backend::{MockBackend, OpenAiBackend, OPENROUTER_BASE_URL};
pub use image::{GeneratedImage, HuggingFaceImages, ImageError, ImageGenerator, MockImages};
pub use translate::{LibreTranslate, MockTranslator, TranslateError, Translator};
