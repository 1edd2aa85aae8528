//! OpenAI-compatible HTTP backend for [`GenerativeProvider`].

use async_trait::async_trait;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::ProviderError;
use crate::provider::{CompletionRequest, GenerativeProvider, ImageSpec, VisionRequest};

#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    vision_model: String,
    text_model: String,
    image_model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct DalleRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    quality: &'a str,
    style: &'a str,
    response_format: &'a str,
}

#[derive(Deserialize, Debug)]
struct DalleResponse {
    #[serde(default)]
    data: Vec<DalleImageData>,
}

#[derive(Deserialize, Debug)]
struct DalleImageData {
    url: Option<String>,
    revised_prompt: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize, Debug)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    error: ApiErrorDetails,
}

#[derive(Deserialize, Debug)]
struct ApiErrorDetails {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

impl OpenAiClient {
    /// Builds a client from `config`. The key is not validated here;
    /// callers go through [`Config::validate`] first.
    pub fn new(config: &Config) -> Self {
        OpenAiClient {
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            vision_model: config.vision_model.clone(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            client: reqwest::Client::new(),
        }
    }

    async fn post_json<T>(&self, path: &str, body: &Value) -> Result<T, ProviderError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&response_text)?);
        }

        // Try to parse error response
        let message = match serde_json::from_str::<ApiErrorBody>(&response_text) {
            Ok(body) => {
                error!(
                    "OpenAI API error: {} (type: {:?})",
                    body.error.message, body.error.error_type
                );
                body.error.message
            }
            Err(_) => {
                error!("OpenAI API error (status {}): {}", status, response_text);
                format!("unexpected response body ({} bytes)", response_text.len())
            }
        };

        Err(ProviderError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn chat(&self, model: &str, messages: Value, max_tokens: u32) -> Result<Option<String>, ProviderError> {
        let body = json!({
            "model": model,
            "messages": messages,
            "max_tokens": max_tokens,
        });

        let response: ChatResponse = self.post_json("/chat/completions", &body).await?;
        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty()))
    }
}

#[async_trait]
impl GenerativeProvider for OpenAiClient {
    async fn describe_image(&self, request: VisionRequest) -> Result<Option<String>, ProviderError> {
        info!("Describing image with {} | max_tokens: {}", self.vision_model, request.max_tokens);

        let messages = json!([
            {
                "role": "user",
                "content": [
                    { "type": "text", "text": request.instruction },
                    { "type": "image_url", "image_url": { "url": request.image_data_url } }
                ]
            }
        ]);

        self.chat(&self.vision_model, messages, request.max_tokens).await
    }

    async fn generate_images(&self, spec: ImageSpec) -> Result<Vec<String>, ProviderError> {
        info!(
            "Generating image with {} | Size: {} | Quality: {} | Style: {} | Prompt: '{}'",
            self.image_model,
            spec.size.as_str(),
            spec.quality.as_str(),
            spec.style.as_str(),
            spec.prompt.chars().take(100).collect::<String>()
        );

        let request = DalleRequest {
            model: &self.image_model,
            prompt: &spec.prompt,
            n: spec.count,
            size: spec.size.as_str(),
            quality: spec.quality.as_str(),
            style: spec.style.as_str(),
            response_format: "url",
        };

        let response: DalleResponse = self
            .post_json("/images/generations", &serde_json::to_value(&request)?)
            .await?;

        if let Some(revised) = response.data.first().and_then(|d| d.revised_prompt.as_ref()) {
            debug!("Provider revised prompt: {}", revised);
        }

        Ok(response.data.into_iter().filter_map(|d| d.url).collect())
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Option<String>, ProviderError> {
        info!("Requesting completion from {} | max_tokens: {}", self.text_model, request.max_tokens);

        let messages = json!([
            { "role": "system", "content": request.system },
            { "role": "user", "content": request.user }
        ]);

        self.chat(&self.text_model, messages, request.max_tokens).await
    }
}
