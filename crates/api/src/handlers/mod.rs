pub mod character;
pub mod character_flow;
pub mod download;
pub mod scene;
pub mod scene_flow;
