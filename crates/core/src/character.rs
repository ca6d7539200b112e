//! Character records and naming helpers.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::image::ImageArtifact;
use crate::types::{new_id, EntityId, Timestamp};

/// Name given to a committed character when the user leaves it blank.
pub const DEFAULT_CHARACTER_NAME: &str = "Untitled Character";

/// A saved character portrait.
///
/// Immutable once committed; the only lifecycle event after creation is
/// deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: EntityId,
    pub name: String,
    pub image_url: ImageArtifact,
    /// Generation prompt; absent for uploaded portraits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: Timestamp,
}

impl Character {
    /// Build a new character with a fresh id, stamped with the current time.
    pub fn new(name: Option<&str>, image_url: ImageArtifact, prompt: Option<String>) -> Self {
        Self {
            id: new_id(),
            name: resolve_name(name),
            image_url,
            prompt,
            created_at: Utc::now(),
        }
    }

    /// File name offered when the portrait is exported.
    pub fn export_filename(&self) -> String {
        format!(
            "{}.{}",
            sanitize_filename(&self.name),
            self.image_url.file_extension()
        )
    }
}

/// Trim a user-supplied name, substituting [`DEFAULT_CHARACTER_NAME`] when blank.
pub fn resolve_name(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => DEFAULT_CHARACTER_NAME.to_string(),
    }
}

/// Replace path separators and control characters so the name is safe to
/// use as a download file name.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '"' | '*' | '?' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        "character".to_string()
    } else {
        trimmed.to_string()
    }
}
