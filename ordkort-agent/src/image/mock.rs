//! In-process image generator for tests.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use super::{GeneratedImage, ImageError, ImageGenerator};

/// PNG signature, enough for content sniffing in tests.
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

pub struct MockImages {
    available: AtomicBool,
    call_count: AtomicU32,
    last_prompt: Mutex<Option<String>>,
    content_type: String,
}

impl MockImages {
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            call_count: AtomicU32::new(0),
            last_prompt: Mutex::new(None),
            content_type: "image/png".to_string(),
        }
    }

    /// Content type reported with every image.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_available(self, available: bool) -> Self {
        self.available.store(available, Ordering::SeqCst);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Default for MockImages {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerator for MockImages {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }

        if !self.available.load(Ordering::SeqCst) {
            return Err(ImageError::Unavailable("Mock images disabled".to_string()));
        }

        Ok(GeneratedImage {
            bytes: Bytes::from_static(PNG_MAGIC),
            content_type: self.content_type.clone(),
        })
    }
}
