//! Inline data URLs for multimodal requests.

use base64::{engine::general_purpose, Engine as _};
use log::debug;
use std::borrow::Cow;

use crate::error::EncodingError;
use crate::models::ImageBlob;

/// Encodes `blob` as `data:<mime>;base64,<payload>`.
pub async fn encode_data_url(blob: &ImageBlob) -> Result<String, EncodingError> {
    let (data, declared): (Cow<'_, [u8]>, Option<&str>) = match blob {
        ImageBlob::Bytes { data, content_type } => {
            (Cow::Borrowed(data.as_slice()), content_type.as_deref())
        }
        ImageBlob::File(path) => {
            debug!("Reading image from {}", path.display());
            (Cow::Owned(tokio::fs::read(path).await?), None)
        }
    };

    if data.is_empty() {
        return Err(EncodingError::Empty);
    }

    let mime = declared
        .filter(|ct| ct.starts_with("image/"))
        .or_else(|| sniff_mime(&data))
        .ok_or_else(|| EncodingError::UnsupportedFormat {
            declared: declared.map(str::to_string),
        })?;

    debug!("Encoding {} byte {} image", data.len(), mime);
    Ok(format!(
        "data:{};base64,{}",
        mime,
        general_purpose::STANDARD.encode(&data)
    ))
}

fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    image::guess_format(data).ok().map(|format| format.to_mime_type())
}
