//! # Feature: Captions & Hashtags
//!
//! Asks a text model for a JSON `{caption, hashtags}` object and never fails:
//! a failed or empty call yields [`default_captions`], an unparseable (or
//! `null`) reply yields the longer [`unparsed_reply_captions`].
//!
//! The two fallback pairs are distinct and stay distinct.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with JSON replies and two fallback pairs

use log::{debug, info, warn};
use serde_json::Value;
use std::sync::Arc;

use crate::error::CaptionError;
use crate::models::{CaptionSet, RestaurantInfo};
use crate::prompts::{caption_system_prompt, caption_user_prompt};
use crate::provider::{CompletionRequest, GenerativeProvider};

pub const CAPTION_MAX_TOKENS: u32 = 500;

pub const DEFAULT_CAPTION: &str = "Delicious food that speaks for itself!";
pub const DEFAULT_HASHTAGS: &[&str] = &["food", "delicious", "restaurant", "foodie", "yummy"];

pub const UNPARSED_REPLY_CAPTION: &str =
    "Fresh, delicious, and made with love! Come taste the difference.";
pub const UNPARSED_REPLY_HASHTAGS: &[&str] = &[
    "food",
    "fresh",
    "delicious",
    "restaurant",
    "foodie",
    "homemade",
    "quality",
    "tasty",
    "instafood",
    "foodphotography",
];

/// Used when the completion call fails or returns nothing.
pub fn default_captions() -> CaptionSet {
    CaptionSet::from_static(DEFAULT_CAPTION, DEFAULT_HASHTAGS)
}

/// Used when the completion returns text that is not JSON, or JSON `null`.
pub fn unparsed_reply_captions() -> CaptionSet {
    CaptionSet::from_static(UNPARSED_REPLY_CAPTION, UNPARSED_REPLY_HASHTAGS)
}

#[derive(Clone)]
pub struct CaptionGenerator {
    provider: Arc<dyn GenerativeProvider>,
}

impl CaptionGenerator {
    pub fn new(provider: Arc<dyn GenerativeProvider>) -> Self {
        CaptionGenerator { provider }
    }

    /// `prompt_text` is the user's own prompt, not the composed image prompt.
    pub async fn generate(&self, prompt_text: &str, restaurant: Option<&RestaurantInfo>) -> CaptionSet {
        match self.request(prompt_text, restaurant).await {
            Ok(captions) => {
                info!("Caption generated | {} hashtags", captions.hashtags.len());
                captions
            }
            Err(e @ (CaptionError::Parse(_) | CaptionError::NullReply)) => {
                warn!("Caption reply could not be read, using fallback: {}", e);
                unparsed_reply_captions()
            }
            Err(e) => {
                warn!("Error generating caption and hashtags: {}", e);
                default_captions()
            }
        }
    }

    async fn request(
        &self,
        prompt_text: &str,
        restaurant: Option<&RestaurantInfo>,
    ) -> Result<CaptionSet, CaptionError> {
        let content = self
            .provider
            .complete(CompletionRequest {
                system: caption_system_prompt(restaurant),
                user: caption_user_prompt(prompt_text),
                max_tokens: CAPTION_MAX_TOKENS,
            })
            .await?
            .ok_or(CaptionError::EmptyResponse)?;

        debug!("Caption reply: {}", content);
        parse_caption_reply(&content)
    }
}

/// Parses a model reply into captions. Values are taken as returned; a
/// missing or empty field falls back to the short default, and so does every
/// field of a reply that is valid JSON but not an object.
pub fn parse_caption_reply(content: &str) -> Result<CaptionSet, CaptionError> {
    let reply: Value = serde_json::from_str(strip_code_fence(content)).map_err(CaptionError::Parse)?;
    if reply.is_null() {
        return Err(CaptionError::NullReply);
    }

    let caption = match reply.get("caption") {
        Some(Value::String(caption)) if !caption.is_empty() => caption.clone(),
        Some(value) if !is_blank(value) => value.to_string(),
        _ => DEFAULT_CAPTION.to_string(),
    };

    let hashtags = match reply.get("hashtags") {
        Some(Value::Array(tags)) if !tags.is_empty() => tags
            .iter()
            .map(|tag| match tag {
                Value::String(tag) => tag.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => DEFAULT_HASHTAGS.iter().map(|tag| tag.to_string()).collect(),
    };

    Ok(CaptionSet { caption, hashtags })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::{FakeProvider, Scripted};

    fn generator_with(completion: Scripted<Option<String>>) -> (Arc<FakeProvider>, CaptionGenerator) {
        let provider = Arc::new(FakeProvider::new().with_completion(completion));
        (provider.clone(), CaptionGenerator::new(provider))
    }

    #[tokio::test]
    async fn test_call_failure_returns_short_default() {
        let (_, generator) = generator_with(Scripted::ApiError);

        let captions = generator.generate("pizza", None).await;
        assert_eq!(
            captions,
            CaptionSet {
                caption: "Delicious food that speaks for itself!".to_string(),
                hashtags: vec!["food", "delicious", "restaurant", "foodie", "yummy"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            }
        );
    }

    #[tokio::test]
    async fn test_empty_content_returns_short_default() {
        let (_, generator) = generator_with(Scripted::Ok(None));
        assert_eq!(generator.generate("pizza", None).await, default_captions());
    }

    #[tokio::test]
    async fn test_non_json_returns_richer_fallback() {
        let (_, generator) = generator_with(Scripted::Ok(Some(
            "Here is a caption: Best pizza in town! #pizza".to_string(),
        )));

        let captions = generator.generate("pizza", None).await;
        assert_eq!(captions, unparsed_reply_captions());
        assert_eq!(captions.hashtags.len(), 10);
        assert_ne!(captions, default_captions());
    }

    #[tokio::test]
    async fn test_valid_json_is_used_verbatim() {
        let (_, generator) = generator_with(Scripted::Ok(Some(
            r#"{"caption":"X","hashtags":["a","b"]}"#.to_string(),
        )));

        let captions = generator.generate("pizza", None).await;
        assert_eq!(captions.caption, "X");
        assert_eq!(captions.hashtags, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_request_carries_prompt_and_restaurant() {
        let (provider, generator) = generator_with(Scripted::Ok(None));
        let info = RestaurantInfo::new("Mario's", "Italian", "cozy");

        generator.generate("wood-fired pizza", Some(&info)).await;

        let request = provider.last_completion.lock().unwrap().clone().unwrap();
        assert!(request.system.contains("The restaurant is Mario's"));
        assert!(request.user.contains("request: wood-fired pizza."));
        assert_eq!(request.max_tokens, 500);
    }

    #[test]
    fn test_missing_fields_use_short_defaults() {
        let captions = parse_caption_reply(r#"{"hashtags":["pasta"]}"#).unwrap();
        assert_eq!(captions.caption, DEFAULT_CAPTION);
        assert_eq!(captions.hashtags, vec!["pasta".to_string()]);

        let captions = parse_caption_reply(r#"{"caption":"Mangia!"}"#).unwrap();
        assert_eq!(captions.caption, "Mangia!");
        assert_eq!(captions.hashtags.len(), DEFAULT_HASHTAGS.len());
    }

    #[test]
    fn test_empty_fields_use_short_defaults() {
        let captions = parse_caption_reply(r#"{"caption":"","hashtags":[]}"#).unwrap();
        assert_eq!(captions, default_captions());
    }

    #[test]
    fn test_fenced_json_is_parsed() {
        let reply = "```json\n{\"caption\":\"Fresh pasta\",\"hashtags\":[\"pasta\",\"italian\"]}\n```";
        let captions = parse_caption_reply(reply).unwrap();
        assert_eq!(captions.caption, "Fresh pasta");
        assert_eq!(captions.hashtags, vec!["pasta".to_string(), "italian".to_string()]);
    }

    #[test]
    fn test_padded_values_are_kept_as_returned() {
        let captions = parse_caption_reply(r#"{"caption":"  X  ","hashtags":[" #a ","b",7]}"#).unwrap();
        assert_eq!(captions.caption, "  X  ");
        assert_eq!(
            captions.hashtags,
            vec![" #a ".to_string(), "b".to_string(), "7".to_string()]
        );
    }

    #[test]
    fn test_non_object_json_uses_short_defaults() {
        for reply in ["[1, 2, 3]", "42", "\"text\"", "true"] {
            assert_eq!(parse_caption_reply(reply).unwrap(), default_captions(), "reply: {}", reply);
        }
    }

    #[test]
    fn test_invalid_or_null_json_is_an_error() {
        assert!(matches!(parse_caption_reply("not json"), Err(CaptionError::Parse(_))));
        assert!(matches!(parse_caption_reply("null"), Err(CaptionError::NullReply)));
    }

    #[tokio::test]
    async fn test_array_reply_returns_short_default() {
        let (_, generator) = generator_with(Scripted::Ok(Some("[1, 2, 3]".to_string())));
        assert_eq!(generator.generate("pizza", None).await, default_captions());
    }

    #[tokio::test]
    async fn test_null_reply_returns_richer_fallback() {
        let (_, generator) = generator_with(Scripted::Ok(Some("null".to_string())));
        assert_eq!(generator.generate("pizza", None).await, unparsed_reply_captions());
    }
}
