//! Interaction controller for Cameo's creative flows.
//!
//! [`Studio`] owns the local library and two independent flow state
//! machines (character and scene). It validates user intents, runs one
//! generation call at a time per flow, holds the result as a preview, and
//! commits confirmed previews into the store.

pub mod error;
pub mod export;
pub mod flow;
pub mod studio;

pub use error::StudioError;
pub use export::Export;
pub use flow::{CharacterDraft, FlowKind, FlowSnapshot, FlowStatus, Preview, SceneDraft};
pub use studio::Studio;
