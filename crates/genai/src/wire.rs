//! `generateContent` request and response types.
//!
//! The service exchanges JSON with camelCase keys. A request carries one
//! user turn made of heterogeneous parts (text or inline binary data); a
//! response carries candidates whose content is again a list of parts.
//! Fields Cameo does not use are ignored on deserialization.

use cameo_core::image::{ImageArtifact, DEFAULT_IMAGE_MIME};
use cameo_core::scene::AspectRatio;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

// ---------------------------------------------------------------------------
// Shared content types
// ---------------------------------------------------------------------------

/// One turn of content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single content part: text, inline binary data, or (in responses)
/// something Cameo ignores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
}

/// Inline binary payload, base64-encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub data: String,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// Inline part carrying the payload of an image artifact.
    pub fn image(image: &ImageArtifact) -> Self {
        Self {
            text: None,
            inline_data: Some(Blob {
                mime_type: Some(image.mime_type().to_string()),
                data: image.payload().to_string(),
            }),
        }
    }

    /// Whether this part carries usable inline image data.
    ///
    /// A missing MIME type counts as an image; an explicit non-image MIME
    /// type or an empty payload does not.
    pub fn is_inline_image(&self) -> bool {
        match &self.inline_data {
            Some(blob) => {
                !blob.data.is_empty()
                    && blob
                        .mime_type
                        .as_deref()
                        .map_or(true, |m| m.is_empty() || m.starts_with("image/"))
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Body of `POST /v1beta/models/{model}:generateContent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub image_config: ImageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: AspectRatio,
}

impl GenerateContentRequest {
    /// A single user turn built from `parts`.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: None,
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.generation_config = Some(GenerationConfig {
            image_config: ImageConfig { aspect_ratio },
        });
        self
    }

    /// Parts of the (single) user turn.
    pub fn parts(&self) -> &[Part] {
        self.contents
            .first()
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Parts of the first candidate, or an empty slice.
    pub fn parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// Scan the first candidate's parts in order and return the first
    /// inline image as a data URI artifact.
    pub fn first_inline_image(&self) -> Result<ImageArtifact, GenerationError> {
        let blob = self
            .parts()
            .iter()
            .find(|p| p.is_inline_image())
            .and_then(|p| p.inline_data.as_ref())
            .ok_or(GenerationError::NoImageReturned)?;

        let mime = blob
            .mime_type
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_IMAGE_MIME);

        ImageArtifact::from_base64(mime, &blob.data).map_err(|e| GenerationError::Upstream {
            status: None,
            message: format!("Service returned a malformed image: {e}"),
        })
    }
}

/// Parse a raw response body.
pub fn parse_response(body: &str) -> Result<GenerateContentResponse, serde_json::Error> {
    serde_json::from_str(body)
}
