//! Text instructions sent alongside each generation request.

use cameo_core::scene::AspectRatio;

/// Instruction for a standalone character portrait.
pub fn character_portrait(description: &str) -> String {
    format!(
        "Create a high-quality character portrait based on this description: {description}. \
         The character should be centered, clear, and on a simple background suitable for \
         a character profile."
    )
}

/// Instruction for composing the supplied character images into a scene.
pub fn scene_composition(description: &str, character_names: &[&str], aspect_ratio: AspectRatio) -> String {
    let mut text = format!(
        "Create a complete scene with the provided characters.\n\
         Scene Description: {description}.\n"
    );
    if !character_names.is_empty() {
        text.push_str(&format!(
            "The provided images show, in order: {}.\n",
            character_names.join(", ")
        ));
    }
    text.push_str(&format!(
        "The characters provided in the images should be integrated naturally into this scene.\n\
         Maintain their visual identity and style.\n\
         Aspect Ratio: {aspect_ratio}."
    ));
    text
}

/// Instruction for modifying an existing scene image.
pub fn scene_edit(edit: &str) -> String {
    format!(
        "Modify this image based on the following request: {edit}. \
         Keep the main characters and composition similar but apply the requested changes."
    )
}
