//! Illustration stage: provider image or SVG fallback.

use bytes::Bytes;
use lesson::illustration::{alt_text, fallback_svg, image_prompt, object_path};
use lesson::{Illustration, ImageFormat};
use ordkort_agent::ImageGenerator;
use tracing::{debug, warn};
use uuid::Uuid;

use super::Stage;
use crate::store::{ObjectStore, RecordStore, Result};

/// Where the illustration of a run came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllustrationOutcome {
    pub illustration: Illustration,
    pub format: ImageFormat,
}

/// Produce exactly one illustration, upload it and write it onto the item.
///
/// Provider or PNG upload failures fall back to the SVG; a failure to
/// upload the SVG or to update the item is returned.
pub async fn run(
    records: &dyn RecordStore,
    objects: &dyn ObjectStore,
    stage: Stage<'_, dyn ImageGenerator>,
    content_id: Uuid,
    word: &str,
) -> Result<IllustrationOutcome> {
    let remote_url = match stage {
        Stage::Remote(images) => generate_png(objects, images, content_id, word).await,
        Stage::Fallback => None,
    };

    let (url, format) = match remote_url {
        Some(url) => (url, ImageFormat::Png),
        None => {
            let svg = fallback_svg(word);
            let url = objects
                .upload(
                    &object_path(content_id, ImageFormat::Svg),
                    Bytes::from(svg.into_bytes()),
                    ImageFormat::Svg.content_type(),
                )
                .await?;
            (url, ImageFormat::Svg)
        }
    };

    let illustration = Illustration {
        url,
        alt: alt_text(word),
    };
    records.set_illustration(content_id, &illustration).await?;

    debug!(
        stage = "illustration",
        %content_id,
        format = format.extension(),
        "Stage complete"
    );
    Ok(IllustrationOutcome { illustration, format })
}

async fn generate_png(
    objects: &dyn ObjectStore,
    images: &dyn ImageGenerator,
    content_id: Uuid,
    word: &str,
) -> Option<String> {
    let image = match images.generate(&image_prompt(word)).await {
        Ok(image) => image,
        Err(e) => {
            warn!(stage = "illustration", error = %e, "Image generation failed, using SVG");
            return None;
        }
    };

    match objects
        .upload(
            &object_path(content_id, ImageFormat::Png),
            image.bytes,
            &image.content_type,
        )
        .await
    {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(stage = "illustration", error = %e, "PNG upload failed, using SVG");
            None
        }
    }
}
