//! Text generation backends.
//!
//! - OpenAI-compatible chat completions (OpenRouter, vLLM, Ollama, OpenAI)
//! - Mock backend for testing

pub mod mock;
pub mod openai;
pub mod traits;

pub use mock::MockBackend;
pub use openai::{OpenAiBackend, OPENROUTER_BASE_URL};
pub use traits::{CompletionRequest, CompletionResponse, LlmBackend, LlmError};
