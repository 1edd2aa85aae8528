//! The three logical calls the pipeline makes against a generative-AI provider.

use async_trait::async_trait;

use crate::error::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Square, // 1024x1024
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Square => "1024x1024",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageQuality {
    Hd,
}

impl ImageQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageQuality::Hd => "hd",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStyle {
    Natural, // More natural, less hyper-real
}

impl ImageStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageStyle::Natural => "natural",
        }
    }
}

/// Parameters of one image-synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSpec {
    pub prompt: String,
    pub count: u32,
    pub size: ImageSize,
    pub quality: ImageQuality,
    pub style: ImageStyle,
}

/// One vision call: a single inline image plus an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionRequest {
    pub instruction: String,
    pub image_data_url: String,
    pub max_tokens: u32,
}

/// One text completion: a system and a user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// Generative-AI backend. `Ok(None)` means the call succeeded with no content.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    async fn describe_image(&self, request: VisionRequest) -> Result<Option<String>, ProviderError>;

    /// Returns the image URLs in provider order; may be empty.
    async fn generate_images(&self, spec: ImageSpec) -> Result<Vec<String>, ProviderError>;

    async fn complete(&self, request: CompletionRequest) -> Result<Option<String>, ProviderError>;
}
