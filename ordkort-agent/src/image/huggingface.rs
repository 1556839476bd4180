//! Hugging Face inference API image client.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Serialize;
use tracing::debug;

use super::{GeneratedImage, ImageError, ImageGenerator};

/// Default text-to-image model endpoint.
pub const FLUX_SCHNELL_URL: &str =
    "https://api-inference.huggingface.co/models/black-forest-labs/FLUX.1-schnell";

/// Posts `{"inputs": prompt}` to a model endpoint and returns the raw body.
#[derive(Clone)]
pub struct HuggingFaceImages {
    client: Client,
    model_url: String,
    token: String,
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

impl HuggingFaceImages {
    pub fn with_client(
        client: Client,
        model_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            model_url: model_url.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl ImageGenerator for HuggingFaceImages {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        let response = self
            .client
            .post(&self.model_url)
            .bearer_auth(&self.token)
            .json(&InferenceRequest { inputs: prompt })
            .send()
            .await
            .map_err(|e| ImageError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageError::Network(e.to_string()))?;

        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        debug!(size = bytes.len(), content_type = %content_type, "Image generated");
        Ok(GeneratedImage {
            bytes,
            content_type,
        })
    }
}
