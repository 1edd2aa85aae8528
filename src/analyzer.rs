//! # Feature: Image Analysis
//!
//! Vision-model description of the first uploaded photo, spliced into the
//! generation prompt. Failures degrade to an empty description.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with single-image analysis

use log::{debug, info, warn};
use std::sync::Arc;

use crate::encoding::encode_data_url;
use crate::error::AnalysisError;
use crate::models::ImageBlob;
use crate::prompts::ANALYSIS_INSTRUCTION;
use crate::provider::{GenerativeProvider, VisionRequest};

pub const ANALYSIS_MAX_TOKENS: u32 = 300;

/// Describes the first uploaded photo so the image prompt can reference it.
#[derive(Clone)]
pub struct ImageAnalyzer {
    provider: Arc<dyn GenerativeProvider>,
}

impl ImageAnalyzer {
    pub fn new(provider: Arc<dyn GenerativeProvider>) -> Self {
        ImageAnalyzer { provider }
    }

    /// Returns a description of `images[0]`, or an empty string when there are
    /// no images or the analysis fails for any reason.
    pub async fn analyze(&self, images: &[ImageBlob]) -> String {
        let Some(first) = images.first() else {
            return String::new();
        };

        if images.len() > 1 {
            debug!("Analyzing first of {} uploaded images", images.len());
        }

        match self.describe(first).await {
            Ok(description) => {
                info!("Image analysis complete | {} characters", description.len());
                description
            }
            Err(e) => {
                warn!("Image analysis failed, continuing without it: {}", e);
                String::new()
            }
        }
    }

    async fn describe(&self, image: &ImageBlob) -> Result<String, AnalysisError> {
        let image_data_url = encode_data_url(image).await?;

        let description = self
            .provider
            .describe_image(VisionRequest {
                instruction: ANALYSIS_INSTRUCTION.to_string(),
                image_data_url,
                max_tokens: ANALYSIS_MAX_TOKENS,
            })
            .await?;

        description.ok_or(AnalysisError::EmptyResponse)
    }
}
