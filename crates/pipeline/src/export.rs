//! Image downloads for saved characters and scenes.

use cameo_core::character::Character;
use cameo_core::error::CoreError;
use cameo_core::scene::Scene;

/// A decoded image ready to be offered as a file download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Export {
    pub fn character(character: &Character) -> Result<Self, CoreError> {
        Ok(Self {
            filename: character.export_filename(),
            mime_type: character.image_url.mime_type().to_string(),
            bytes: character.image_url.decode()?,
        })
    }

    pub fn scene(scene: &Scene) -> Result<Self, CoreError> {
        Ok(Self {
            filename: scene.export_filename(),
            mime_type: scene.image_url.mime_type().to_string(),
            bytes: scene.image_url.decode()?,
        })
    }
}
