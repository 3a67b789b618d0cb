//! Uploaded image handling.
//!
//! The page submits the chosen file as a `data:` URL (the result of
//! `FileReader.readAsDataURL`); bare base64 payloads are accepted too. The
//! decoded bytes are re-encoded as a data URL when the request goes out to
//! the model endpoint.

use crate::error::{Result, RoofwattError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Image formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }

    fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&PNG_MAGIC) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&JPEG_MAGIC) {
            Some(ImageFormat::Jpeg)
        } else {
            None
        }
    }
}

/// An uploaded rooftop image, decoded and typed.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

impl UploadedImage {
    /// Create an image from raw bytes, sniffing the format from the content.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(RoofwattError::Validation("an image is required".to_string()));
        }

        let format = ImageFormat::sniff(&bytes).ok_or_else(|| {
            RoofwattError::Validation("unsupported image type; upload a PNG or JPEG".to_string())
        })?;

        Ok(Self { bytes, format })
    }

    /// Decode the upload payload sent by the page: either a `data:` URL or a
    /// bare base64 string.
    pub fn from_payload(payload: &str) -> Result<Self> {
        let trimmed = payload.trim();
        if trimmed.is_empty() {
            return Err(RoofwattError::Validation("an image is required".to_string()));
        }

        let (declared, encoded) = split_data_url(trimmed);

        let bytes = STANDARD.decode(encoded).map_err(|_| {
            RoofwattError::Validation("image payload is not valid base64".to_string())
        })?;

        if bytes.is_empty() {
            return Err(RoofwattError::Validation("an image is required".to_string()));
        }

        let format = declared
            .and_then(ImageFormat::from_mime)
            .or_else(|| ImageFormat::sniff(&bytes))
            .ok_or_else(|| {
                RoofwattError::Validation(
                    "unsupported image type; upload a PNG or JPEG".to_string(),
                )
            })?;

        Ok(Self { bytes, format })
    }

    /// Encode the image as a `data:image/<fmt>;base64,...` URL for the
    /// outbound API call.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), STANDARD.encode(&self.bytes))
    }
}

/// Split a `data:<mime>;base64,<payload>` URL into its media type and
/// payload. Anything that does not look like a data URL is treated as a bare
/// base64 payload.
fn split_data_url(payload: &str) -> (Option<&str>, &str) {
    let Some(rest) = payload.strip_prefix("data:") else {
        return (None, payload);
    };

    match rest.split_once(";base64,") {
        Some((mime, encoded)) => (Some(mime), encoded),
        None => (None, payload),
    }
}
