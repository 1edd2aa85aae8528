//! # Error Taxonomy
//!
//! Only [`PipelineError`] reaches callers of the pipeline. Analysis and caption
//! failures are absorbed where they happen and degrade output quality instead.

use thiserror::Error;

/// Missing or malformed configuration, detected before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("OpenAI API key not configured. Set OPENAI_API_KEY in the environment or .env file")]
    MissingApiKey,

    #[error("Invalid OpenAI API key format. API keys should start with \"sk-\"")]
    InvalidApiKeyFormat,

    #[error("Invalid OpenAI API key format. API keys must not contain whitespace")]
    ApiKeyWhitespace,

    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

/// An image could not be turned into an inline data URL.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("Failed to read image: {0}")]
    Read(#[from] std::io::Error),

    #[error("Image is empty")]
    Empty,

    #[error("Unsupported image format (declared type: {declared:?})")]
    UnsupportedFormat { declared: Option<String> },
}

/// Failure talking to the generative-AI provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request to provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Vision analysis failed. Never surfaced; the analyzer degrades to no description.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Vision model returned no content")]
    EmptyResponse,
}

/// Image synthesis failed or returned nothing. Fatal for an invocation.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("No image generated")]
    NoImage,

    #[error("Failed to generate image. Please check your API key and try again.")]
    Provider(#[source] ProviderError),
}

/// Caption/hashtag generation failed. Never surfaced; the generator falls back.
#[derive(Debug, Error)]
pub enum CaptionError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("No response from OpenAI")]
    EmptyResponse,

    #[error("Caption response is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Caption response is JSON null")]
    NullReply,
}

/// Everything a caller of the pipeline can observe going wrong.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Generation cancelled")]
    Cancelled,
}
