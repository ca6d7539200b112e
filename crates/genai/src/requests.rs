//! Request payloads for the three generation operations.
//!
//! Pure functions: no I/O, so the payload shape can be asserted directly.

use cameo_core::image::ImageArtifact;
use cameo_core::scene::AspectRatio;

use crate::generator::SceneCharacter;
use crate::prompts;
use crate::wire::{GenerateContentRequest, Part};

/// One text part asking for a centered portrait.
pub fn character_request(prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest::user(vec![Part::text(prompts::character_portrait(prompt))])
}

/// One inline image part per character, in the given order, then exactly
/// one text part describing the scene. The aspect ratio is sent both in the
/// text and as image configuration.
pub fn scene_request(
    prompt: &str,
    characters: &[SceneCharacter],
    aspect_ratio: AspectRatio,
) -> GenerateContentRequest {
    let names: Vec<&str> = characters.iter().map(|c| c.name.as_str()).collect();

    let mut parts: Vec<Part> = characters.iter().map(|c| Part::image(&c.image)).collect();
    parts.push(Part::text(prompts::scene_composition(
        prompt,
        &names,
        aspect_ratio,
    )));

    GenerateContentRequest::user(parts).with_aspect_ratio(aspect_ratio)
}

/// The base image as an inline part followed by the edit instruction.
pub fn edit_request(base_image: &ImageArtifact, edit_prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest::user(vec![
        Part::image(base_image),
        Part::text(prompts::scene_edit(edit_prompt)),
    ])
}
