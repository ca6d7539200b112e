//! Self-contained image artifacts encoded as base64 `data:` URIs.
//!
//! Every image Cameo stores or exchanges with the generation service is
//! carried inline, never as a remote reference. [`ImageArtifact`] keeps the
//! original URI text (it is what gets persisted) and remembers where the
//! MIME type and payload sit inside it.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// MIME type assumed when the generation service does not report one.
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

const DATA_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// A validated `data:<mime>;base64,<payload>` image.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageArtifact {
    uri: String,
    /// Byte offset of the `;base64,` marker inside `uri`.
    marker: usize,
}

impl ImageArtifact {
    /// Parse and validate a data URI.
    pub fn parse(uri: impl Into<String>) -> Result<Self, CoreError> {
        let uri = uri.into();
        let rest = uri.strip_prefix(DATA_SCHEME).ok_or_else(|| {
            CoreError::Validation("Image must be a data: URI".to_string())
        })?;
        let marker = rest.find(BASE64_MARKER).ok_or_else(|| {
            CoreError::Validation("Image data URI must be base64-encoded".to_string())
        })?;

        let mime = &rest[..marker];
        if mime.trim().is_empty() {
            return Err(CoreError::Validation(
                "Image data URI is missing a MIME type".to_string(),
            ));
        }
        if rest[marker + BASE64_MARKER.len()..].is_empty() {
            return Err(CoreError::Validation(
                "Image data URI has an empty payload".to_string(),
            ));
        }

        Ok(Self {
            marker: DATA_SCHEME.len() + marker,
            uri,
        })
    }

    /// Build an artifact from an already base64-encoded payload.
    pub fn from_base64(mime_type: &str, payload: &str) -> Result<Self, CoreError> {
        Self::parse(format!("{DATA_SCHEME}{mime_type}{BASE64_MARKER}{payload}"))
    }

    /// Build an artifact by base64-encoding raw image bytes.
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Result<Self, CoreError> {
        Self::from_base64(mime_type, &STANDARD.encode(bytes))
    }

    /// The full data URI.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    pub fn mime_type(&self) -> &str {
        &self.uri[DATA_SCHEME.len()..self.marker]
    }

    /// The base64 text after the comma.
    pub fn payload(&self) -> &str {
        &self.uri[self.marker + BASE64_MARKER.len()..]
    }

    /// Decode the payload into raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, CoreError> {
        STANDARD
            .decode(self.payload())
            .map_err(|e| CoreError::Validation(format!("Image payload is not valid base64: {e}")))
    }

    /// File extension matching the MIME type, falling back to `png`.
    pub fn file_extension(&self) -> &'static str {
        match self.mime_type() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

// Payloads run to megabytes; keep debug output readable.
impl fmt::Debug for ImageArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageArtifact")
            .field("mime_type", &self.mime_type())
            .field("payload_len", &self.payload().len())
            .finish()
    }
}

impl fmt::Display for ImageArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl Serialize for ImageArtifact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.uri)
    }
}

impl<'de> Deserialize<'de> for ImageArtifact {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let uri = String::deserialize(deserializer)?;
        Self::parse(uri).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_mime_and_payload() {
        let img = ImageArtifact::parse("data:image/jpeg;base64,AAEC").unwrap();
        assert_eq!(img.mime_type(), "image/jpeg");
        assert_eq!(img.payload(), "AAEC");
        assert_eq!(img.file_extension(), "jpg");
        assert_eq!(img.as_str(), "data:image/jpeg;base64,AAEC");
    }

    #[test]
    fn parse_rejects_remote_urls() {
        let err = ImageArtifact::parse("https://example.com/fox.png").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn parse_rejects_non_base64_uris() {
        assert!(ImageArtifact::parse("data:image/png,rawbytes").is_err());
    }

    #[test]
    fn parse_rejects_missing_mime_or_payload() {
        assert!(ImageArtifact::parse("data:;base64,AAEC").is_err());
        assert!(ImageArtifact::parse("data:image/png;base64,").is_err());
    }

    #[test]
    fn from_bytes_decodes_back_to_the_same_bytes() {
        let bytes = [0x89, b'P', b'N', b'G', 0, 1, 2, 3];
        let img = ImageArtifact::from_bytes("image/png", &bytes).unwrap();
        assert_eq!(img.decode().unwrap(), bytes);
    }

    #[test]
    fn decode_reports_corrupt_payloads() {
        let img = ImageArtifact::parse("data:image/png;base64,@@@").unwrap();
        assert!(img.decode().is_err());
    }

    #[test]
    fn unknown_mime_falls_back_to_png_extension() {
        let img = ImageArtifact::from_base64("image/x-custom", "AAEC").unwrap();
        assert_eq!(img.file_extension(), "png");
    }

    #[test]
    fn serializes_as_plain_string() {
        let img = ImageArtifact::from_base64("image/webp", "AAEC").unwrap();
        let json = serde_json::to_value(&img).unwrap();
        assert_eq!(json, serde_json::json!("data:image/webp;base64,AAEC"));

        let back: ImageArtifact = serde_json::from_value(json).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn deserialize_rejects_invalid_uris() {
        let result: Result<ImageArtifact, _> = serde_json::from_str("\"not-an-image\"");
        assert!(result.is_err());
    }

    #[test]
    fn debug_output_omits_payload() {
        let img = ImageArtifact::from_base64("image/png", "AAECAwQF").unwrap();
        let debug = format!("{img:?}");
        assert!(debug.contains("payload_len: 8"));
        assert!(!debug.contains("AAECAwQF"));
    }
}
