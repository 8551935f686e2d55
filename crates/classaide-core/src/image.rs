//! Inline image payloads for vision requests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::ProviderError;
use crate::traits::InlineImage;

/// Largest image accepted for upload.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Detect a supported image format from its leading bytes.
pub fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

impl InlineImage {
    /// Encode raw image bytes, rejecting unknown formats and oversized files.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProviderError> {
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ProviderError::InvalidImage(format!(
                "image is {} bytes; the limit is 10MB",
                bytes.len()
            )));
        }
        let mime_type = sniff_mime_type(bytes).ok_or_else(|| {
            ProviderError::InvalidImage("unsupported format; use JPEG, PNG or WebP".into())
        })?;
        Ok(Self {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(bytes),
        })
    }

    /// Accept either a `data:<mime>;base64,<payload>` URL or a bare payload.
    pub fn from_data_url(url: &str) -> Result<Self, ProviderError> {
        let (declared, payload) = match url.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest.split_once(',').ok_or_else(|| {
                    ProviderError::InvalidImage("data URL has no payload".into())
                })?;
                let mime = header.strip_suffix(";base64").ok_or_else(|| {
                    ProviderError::InvalidImage("data URL is not base64 encoded".into())
                })?;
                (Some(mime), payload)
            }
            None => (None, url),
        };

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| ProviderError::InvalidImage(format!("bad base64 payload: {e}")))?;
        let image = Self::from_bytes(&bytes)?;
        if let Some(declared) = declared {
            if !declared.is_empty() && declared != image.mime_type {
                tracing::warn!(
                    declared,
                    detected = %image.mime_type,
                    "data URL mime type does not match image contents"
                );
            }
        }
        Ok(image)
    }

    /// Load and encode an image file.
    pub fn from_path(path: &std::path::Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read image: {}", path.display()))?;
        Self::from_bytes(&bytes).with_context(|| format!("rejected image: {}", path.display()))
    }
}
