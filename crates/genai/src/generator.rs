//! The generation operations Cameo's flows depend on.

use async_trait::async_trait;
use cameo_core::image::ImageArtifact;
use cameo_core::scene::AspectRatio;

use crate::client::GenAiClient;
use crate::error::GenerationError;
use crate::requests;

/// A character supplied as a visual reference for scene composition.
#[derive(Debug, Clone)]
pub struct SceneCharacter {
    pub name: String,
    pub image: ImageArtifact,
}

/// Source of generated images.
///
/// Each operation yields exactly one image artifact or fails wholesale.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// A centered portrait on a simple background.
    async fn generate_character(&self, prompt: &str) -> Result<ImageArtifact, GenerationError>;

    /// The given characters rendered into the described scene, preserving
    /// their visual identity.
    async fn generate_scene(
        &self,
        prompt: &str,
        characters: &[SceneCharacter],
        aspect_ratio: AspectRatio,
    ) -> Result<ImageArtifact, GenerationError>;

    /// `base_image` modified as requested, keeping its composition.
    async fn edit_scene(
        &self,
        base_image: &ImageArtifact,
        edit_prompt: &str,
    ) -> Result<ImageArtifact, GenerationError>;

    /// Whether a credential is configured. Used for health reporting only.
    fn has_credential(&self) -> bool {
        true
    }
}

#[async_trait]
impl ImageGenerator for GenAiClient {
    async fn generate_character(&self, prompt: &str) -> Result<ImageArtifact, GenerationError> {
        self.generate_image("generate_character", &requests::character_request(prompt))
            .await
    }

    async fn generate_scene(
        &self,
        prompt: &str,
        characters: &[SceneCharacter],
        aspect_ratio: AspectRatio,
    ) -> Result<ImageArtifact, GenerationError> {
        let request = requests::scene_request(prompt, characters, aspect_ratio);
        self.generate_image("generate_scene", &request).await
    }

    async fn edit_scene(
        &self,
        base_image: &ImageArtifact,
        edit_prompt: &str,
    ) -> Result<ImageArtifact, GenerationError> {
        self.generate_image("edit_scene", &requests::edit_request(base_image, edit_prompt))
            .await
    }

    fn has_credential(&self) -> bool {
        self.config().has_credential()
    }
}
