//! Client library for the generative-image service.
//!
//! Builds `generateContent` request payloads for the three Cameo
//! operations (character portrait, scene composition, scene edit), sends
//! them over HTTP with [`reqwest`], and extracts the single image artifact
//! each operation yields.

pub mod client;
pub mod config;
pub mod error;
pub mod generator;
pub mod prompts;
pub mod requests;
pub mod wire;

pub use client::GenAiClient;
pub use config::GenAiConfig;
pub use error::GenerationError;
pub use generator::{ImageGenerator, SceneCharacter};
