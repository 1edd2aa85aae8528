//! # Feature: Food Image Pipeline
//!
//! One invocation: analyze the first raw image, compose the prompt, then
//! generate the image and the captions concurrently. Only image generation can
//! fail the invocation, and when it does the caption call is dropped.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with concurrent image and caption generation

use log::{debug, info, warn};
use std::future::Future;
use std::sync::Arc;

use crate::analyzer::ImageAnalyzer;
use crate::captions::CaptionGenerator;
use crate::config::Config;
use crate::error::{GenerationError, PipelineError};
use crate::image_gen::ImageGenerator;
use crate::models::{GeneratedResult, GenerationRequest};
use crate::openai::OpenAiClient;
use crate::prompts::compose_generation_prompt;
use crate::provider::GenerativeProvider;

#[derive(Clone)]
pub struct FoodImagePipeline {
    analyzer: ImageAnalyzer,
    image_generator: ImageGenerator,
    caption_generator: CaptionGenerator,
}

impl FoodImagePipeline {
    pub fn new(provider: Arc<dyn GenerativeProvider>) -> Self {
        FoodImagePipeline {
            analyzer: ImageAnalyzer::new(provider.clone()),
            image_generator: ImageGenerator::new(provider.clone()),
            caption_generator: CaptionGenerator::new(provider),
        }
    }

    /// Validates the API key, then wires the pipeline to the OpenAI backend.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self::new(Arc::new(OpenAiClient::new(config))))
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedResult, PipelineError> {
        info!(
            "🍽️ Generating food image | prompt: {} chars | raw images: {} | reference: {} | restaurant: {}",
            request.prompt_text.len(),
            request.raw_images.len(),
            request.reference_image.is_some(),
            request
                .restaurant_info
                .as_ref()
                .map(|info| info.name.as_str())
                .unwrap_or("-")
        );

        let analysis = self.analyzer.analyze(&request.raw_images).await;

        let prompt = compose_generation_prompt(
            &request.prompt_text,
            &analysis,
            request.restaurant_info.as_ref(),
        );
        debug!("Composed generation prompt: {}", prompt);

        let captions = async {
            Ok::<_, GenerationError>(
                self.caption_generator
                    .generate(&request.prompt_text, request.restaurant_info.as_ref())
                    .await,
            )
        };
        let (image_url, captions) =
            tokio::try_join!(self.image_generator.generate(&prompt), captions)?;

        let result = GeneratedResult::new(image_url, captions);
        info!("✅ Food image ready | {} hashtags", result.hashtags.len());
        Ok(result)
    }

    /// Like [`generate`](Self::generate), but gives up as soon as `cancel`
    /// resolves. Outstanding provider calls are dropped and nothing partial is
    /// returned.
    pub async fn generate_until<C>(
        &self,
        request: &GenerationRequest,
        cancel: C,
    ) -> Result<GeneratedResult, PipelineError>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            result = self.generate(request) => result,
            _ = cancel => {
                warn!("Generation cancelled by caller");
                Err(PipelineError::Cancelled)
            }
        }
    }
}
