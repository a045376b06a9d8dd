// src/services/encoder.rs
use crate::errors::VeritasError;
use base64::{Engine as _, engine::general_purpose};
use image::GenericImageView;

/// Transport payload for one accepted upload. `base64` is the raw base64
/// body only; no data-URI prefix ever reaches the analysis client.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub base64: String,
    pub width: u32,
    pub height: u32,
}

pub struct ImageEncoder;

impl ImageEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encodes accepted bytes for transport. The bytes must decode as an
    /// image; anything unreadable is a read failure and produces no partial
    /// payload.
    pub fn encode(&self, data: &[u8]) -> Result<EncodedImage, VeritasError> {
        let img = image::load_from_memory(data)
            .map_err(|e| VeritasError::ReadFailure(format!("could not decode image: {}", e)))?;

        let (width, height) = img.dimensions();

        Ok(EncodedImage {
            base64: general_purpose::STANDARD.encode(data),
            width,
            height,
        })
    }

    /// Decodes the base64 body of a client-side-encoded submission back into
    /// raw bytes.
    pub fn decode_base64(&self, body: &str) -> Result<Vec<u8>, VeritasError> {
        general_purpose::STANDARD
            .decode(body.trim())
            .map_err(|e| VeritasError::ReadFailure(format!("invalid base64 payload: {}", e)))
    }
}

impl Default for ImageEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a `data:<mime>;base64,` prefix off a payload, returning the
/// declared MIME type (if any) and the base64 body. A bare base64 string
/// passes through untouched.
pub fn strip_data_uri_prefix(input: &str) -> (Option<&str>, &str) {
    if let Some(rest) = input.strip_prefix("data:") {
        if let Some((header, body)) = rest.split_once(',') {
            let mime = header.strip_suffix(";base64").filter(|m| !m.is_empty());
            return (mime, body);
        }
    }
    (None, input)
}
