use serde::{Deserialize, Serialize};
use std::env;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEXT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_PORT: u16 = 8080;

/// Value shipped in templates in place of a real key.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_OPENAI_API_KEY_HERE";
const API_KEY_PREFIX: &str = "sk-";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub vision_model: String,
    pub text_model: String,
    pub image_model: String,
    pub log_level: String,
    pub port: u16,
}

/// Displayable outcome of checking the configured API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiKeyStatus {
    pub is_valid: bool,
    pub message: String,
}

impl Config {
    /// Builds a configuration around `openai_api_key` with every other setting at its default.
    /// Surrounding whitespace is stripped from the key.
    pub fn new(openai_api_key: impl Into<String>) -> Self {
        Config {
            openai_api_key: openai_api_key.into().trim().to_string(),
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            log_level: "info".to_string(),
            port: DEFAULT_PORT,
        }
    }

    /// Reads the process environment. A missing key is not an error here;
    /// it is reported by [`Config::validate`] before any provider call.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue { var: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            openai_api_key: lookup("OPENAI_API_KEY")
                .map(|key| key.trim().to_string())
                .unwrap_or_default(),
            openai_base_url: lookup("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            vision_model: lookup("OPENAI_VISION_MODEL")
                .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            text_model: lookup("OPENAI_TEXT_MODEL")
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image_model: lookup("OPENAI_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            port,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.openai_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Checks the API key is present and looks like a provider key. The key
    /// is sent as-is in the `Authorization` header, so any whitespace left in
    /// it is rejected here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = self.openai_api_key.as_str();
        if key.trim().is_empty() || key == PLACEHOLDER_API_KEY {
            return Err(ConfigError::MissingApiKey);
        }
        if key.chars().any(char::is_whitespace) {
            return Err(ConfigError::ApiKeyWhitespace);
        }
        if !key.starts_with(API_KEY_PREFIX) {
            return Err(ConfigError::InvalidApiKeyFormat);
        }
        Ok(())
    }

    pub fn api_key_status(&self) -> ApiKeyStatus {
        match self.validate() {
            Ok(()) => ApiKeyStatus {
                is_valid: true,
                message: "API key configured correctly".to_string(),
            },
            Err(e) => ApiKeyStatus {
                is_valid: false,
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_config_with_defaults() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.vision_model, "gpt-4o-mini");
        assert_eq!(config.image_model, "dall-e-3");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:9999/v1/"),
            ("OPENAI_IMAGE_MODEL", "dall-e-2"),
            ("LOG_LEVEL", "debug"),
            ("PORT", "3000"),
        ]))
        .unwrap();
        assert_eq!(config.openai_base_url, "http://localhost:9999/v1");
        assert_eq!(config.image_model, "dall-e-2");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_config_rejects_bad_port() {
        let result = Config::from_lookup(lookup_from(&[("PORT", "not-a-port")]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidValue { var: "PORT", value: "not-a-port".to_string() }
        );
    }

    #[test]
    fn test_validate_missing_key() {
        assert_eq!(Config::new("").validate(), Err(ConfigError::MissingApiKey));
        assert_eq!(
            Config::new(PLACEHOLDER_API_KEY).validate(),
            Err(ConfigError::MissingApiKey)
        );
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.validate(), Err(ConfigError::MissingApiKey));
    }

    #[test]
    fn test_validate_key_prefix() {
        assert_eq!(
            Config::new("pk-live-123").validate(),
            Err(ConfigError::InvalidApiKeyFormat)
        );
        assert!(Config::new("sk-proj-abc123").validate().is_ok());
    }

    #[test]
    fn test_key_whitespace_is_stripped_or_rejected() {
        let config = Config::new("sk-abc\n");
        assert_eq!(config.openai_api_key, "sk-abc");
        assert!(config.validate().is_ok());

        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "  sk-abc \r\n")])).unwrap();
        assert_eq!(config.openai_api_key, "sk-abc");

        let mut config = Config::new("sk-abc");
        config.openai_api_key = "sk-abc\n".to_string();
        assert_eq!(config.validate(), Err(ConfigError::ApiKeyWhitespace));

        assert_eq!(Config::new("sk-a bc").validate(), Err(ConfigError::ApiKeyWhitespace));
    }

    #[test]
    fn test_api_key_status_messages() {
        let status = Config::new("").api_key_status();
        assert!(!status.is_valid);
        assert!(status.message.contains("not configured"));

        let status = Config::new("abc").api_key_status();
        assert!(!status.is_valid);
        assert!(status.message.contains("should start with \"sk-\""));

        let status = Config::new("sk-abc").api_key_status();
        assert!(status.is_valid);
        assert_eq!(status.message, "API key configured correctly");
    }
}
