//! # Feature: Image Generation
//!
//! Turns a composed prompt into one enhanced food photo. The call parameters
//! are fixed: one square, HD, natural-style image.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with DALL-E 3 integration

use log::{error, info};
use std::sync::Arc;

use crate::error::GenerationError;
use crate::provider::{GenerativeProvider, ImageQuality, ImageSize, ImageSpec, ImageStyle};

#[derive(Clone)]
pub struct ImageGenerator {
    provider: Arc<dyn GenerativeProvider>,
    size: ImageSize,
    quality: ImageQuality,
    style: ImageStyle,
}

impl ImageGenerator {
    pub fn new(provider: Arc<dyn GenerativeProvider>) -> Self {
        ImageGenerator {
            provider,
            size: ImageSize::Square,
            quality: ImageQuality::Hd,
            style: ImageStyle::Natural,
        }
    }

    /// Generates one image and returns its URL. Not retried on failure.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let spec = ImageSpec {
            prompt: prompt.to_string(),
            count: 1,
            size: self.size,
            quality: self.quality,
            style: self.style,
        };

        let urls = self.provider.generate_images(spec).await.map_err(|e| {
            error!("Image generation failed: {}", e);
            GenerationError::Provider(e)
        })?;

        match urls.into_iter().next() {
            Some(url) => {
                info!("Image generated successfully | URL length: {}", url.len());
                Ok(url)
            }
            None => {
                error!("No image data in provider response");
                Err(GenerationError::NoImage)
            }
        }
    }
}
