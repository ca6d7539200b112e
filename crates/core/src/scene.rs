//! Scene records and aspect ratios.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::image::ImageArtifact;
use crate::types::{new_id, EntityId, Timestamp};

/// Output shape requested for a composed scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 3] = [Self::Square, Self::Landscape, Self::Portrait];

    /// The `W:H` label used on the wire and in prompts.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid aspect ratio '{s}'. Must be one of: 1:1, 16:9, 9:16"
                ))
            })
    }
}

/// A saved composite scene.
///
/// `character_ids` are loose references: deleting a character leaves them
/// in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: EntityId,
    pub image_url: ImageArtifact,
    pub prompt: String,
    pub character_ids: Vec<EntityId>,
    pub aspect_ratio: AspectRatio,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: Timestamp,
}

impl Scene {
    pub fn new(
        image_url: ImageArtifact,
        prompt: String,
        character_ids: Vec<EntityId>,
        aspect_ratio: AspectRatio,
    ) -> Self {
        Self {
            id: new_id(),
            image_url,
            prompt,
            character_ids,
            aspect_ratio,
            created_at: Utc::now(),
        }
    }

    pub fn export_filename(&self) -> String {
        format!("scene-{}.{}", self.id, self.image_url.file_extension())
    }
}
