use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Restaurant metadata that personalises prompts and captions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantInfo {
    pub name: String,
    pub cuisine_type: String,
    pub brand_personality: String,
}

impl RestaurantInfo {
    pub fn new(
        name: impl Into<String>,
        cuisine_type: impl Into<String>,
        brand_personality: impl Into<String>,
    ) -> Self {
        RestaurantInfo {
            name: name.into(),
            cuisine_type: cuisine_type.into(),
            brand_personality: brand_personality.into(),
        }
    }
}

/// A user-submitted image, either already in memory or on disk.
#[derive(Debug, Clone)]
pub enum ImageBlob {
    Bytes {
        data: Vec<u8>,
        content_type: Option<String>,
    },
    File(PathBuf),
}

impl ImageBlob {
    pub fn from_bytes(data: impl Into<Vec<u8>>, content_type: Option<String>) -> Self {
        ImageBlob::Bytes {
            data: data.into(),
            content_type,
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        ImageBlob::File(path.into())
    }
}

/// One generation cycle's input. Built once, then only read.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub prompt_text: String,
    pub raw_images: Vec<ImageBlob>,
    /// Style exemplar. Accepted and carried, but not sent to the provider.
    pub reference_image: Option<ImageBlob>,
    pub restaurant_info: Option<RestaurantInfo>,
}

impl GenerationRequest {
    pub fn new(prompt_text: impl Into<String>) -> Self {
        GenerationRequest {
            prompt_text: prompt_text.into(),
            ..Default::default()
        }
    }

    pub fn with_raw_image(mut self, image: ImageBlob) -> Self {
        self.raw_images.push(image);
        self
    }

    pub fn with_reference_image(mut self, image: ImageBlob) -> Self {
        self.reference_image = Some(image);
        self
    }

    pub fn with_restaurant(mut self, info: RestaurantInfo) -> Self {
        self.restaurant_info = Some(info);
        self
    }

    /// True when there is nothing to generate from.
    pub fn is_empty(&self) -> bool {
        self.prompt_text.trim().is_empty() && self.raw_images.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionSet {
    pub caption: String,
    pub hashtags: Vec<String>,
}

impl CaptionSet {
    pub(crate) fn from_static(caption: &str, hashtags: &[&str]) -> Self {
        CaptionSet {
            caption: caption.to_string(),
            hashtags: hashtags.iter().map(|tag| tag.to_string()).collect(),
        }
    }
}

/// The enhanced image plus its social copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedResult {
    #[serde(rename = "url")]
    pub image_url: String,
    pub caption: String,
    pub hashtags: Vec<String>,
}

impl GeneratedResult {
    pub fn new(image_url: String, captions: CaptionSet) -> Self {
        GeneratedResult {
            image_url,
            caption: captions.caption,
            hashtags: captions.hashtags,
        }
    }
}
