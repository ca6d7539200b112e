//! Per-flow state machine.
//!
//! ```text
//! Idle ──generate──▶ Generating ──ok──▶ Previewing ──commit/discard──▶ Idle
//!                        │  ▲                │
//!                        │  └─────edit───────┘   (scene flow only)
//!                        └──err──▶ Idle
//! ```
//!
//! The state value itself is the re-entrancy guard: a flow that is
//! `Generating` refuses to start another call.

use std::fmt;

use cameo_core::image::ImageArtifact;
use cameo_core::scene::AspectRatio;
use cameo_core::types::EntityId;
use serde::Serialize;

use crate::error::StudioError;

/// The two independent creative pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Character,
    Scene,
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Character => "character",
            Self::Scene => "scene",
        })
    }
}

/// Metadata carried by a character preview until commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDraft {
    /// `None` for uploaded portraits.
    pub prompt: Option<String>,
}

/// Metadata carried by a scene preview until commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDraft {
    pub prompt: String,
    pub character_ids: Vec<EntityId>,
    pub aspect_ratio: AspectRatio,
}

/// An uncommitted artifact and the draft it was generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview<D> {
    pub image_url: ImageArtifact,
    #[serde(flatten)]
    pub draft: D,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState<D> {
    Idle,
    Generating,
    Previewing(Preview<D>),
}

/// Coarse state label exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    Idle,
    Generating,
    Previewing,
}

/// Serializable view of a flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSnapshot<D> {
    pub flow: FlowKind,
    pub state: FlowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Preview<D>>,
}

/// One flow instance.
#[derive(Debug)]
pub struct Flow<D> {
    kind: FlowKind,
    state: FlowState<D>,
}

impl<D: Clone> Flow<D> {
    pub fn new(kind: FlowKind) -> Self {
        Self {
            kind,
            state: FlowState::Idle,
        }
    }

    pub fn kind(&self) -> FlowKind {
        self.kind
    }

    pub fn state(&self) -> &FlowState<D> {
        &self.state
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.state, FlowState::Generating)
    }

    /// Enter `Generating` for a fresh generation. An existing preview is
    /// dropped; a call already in flight is refused.
    pub fn start_generating(&mut self) -> Result<(), StudioError> {
        self.ensure_not_generating()?;
        self.state = FlowState::Generating;
        Ok(())
    }

    /// Enter `Generating` for an edit of the current preview, handing the
    /// preview back so its image can serve as the base.
    pub fn start_editing(&mut self) -> Result<Preview<D>, StudioError> {
        self.ensure_not_generating()?;
        match std::mem::replace(&mut self.state, FlowState::Generating) {
            FlowState::Previewing(preview) => Ok(preview),
            other => {
                self.state = other;
                Err(StudioError::NoPreview(self.kind))
            }
        }
    }

    /// Leave `Generating` with the outcome of the call: a preview on
    /// success, `Idle` on failure.
    pub fn finish(&mut self, outcome: Option<Preview<D>>) {
        self.state = match outcome {
            Some(preview) => FlowState::Previewing(preview),
            None => FlowState::Idle,
        };
    }

    /// Place an artifact straight into preview without generating.
    pub fn set_preview(&mut self, preview: Preview<D>) -> Result<(), StudioError> {
        self.ensure_not_generating()?;
        self.state = FlowState::Previewing(preview);
        Ok(())
    }

    /// Take the preview for commit, returning the flow to `Idle`.
    pub fn take_preview(&mut self) -> Result<Preview<D>, StudioError> {
        self.ensure_not_generating()?;
        match std::mem::replace(&mut self.state, FlowState::Idle) {
            FlowState::Previewing(preview) => Ok(preview),
            other => {
                self.state = other;
                Err(StudioError::NoPreview(self.kind))
            }
        }
    }

    /// Put back a preview taken by [`Flow::take_preview`] whose commit failed.
    pub fn restore_preview(&mut self, preview: Preview<D>) {
        if matches!(self.state, FlowState::Idle) {
            self.state = FlowState::Previewing(preview);
        }
    }

    /// Drop any preview. Returns whether there was one.
    pub fn discard(&mut self) -> Result<bool, StudioError> {
        self.ensure_not_generating()?;
        let had_preview = matches!(self.state, FlowState::Previewing(_));
        self.state = FlowState::Idle;
        Ok(had_preview)
    }

    pub fn snapshot(&self) -> FlowSnapshot<D> {
        let (state, preview) = match &self.state {
            FlowState::Idle => (FlowStatus::Idle, None),
            FlowState::Generating => (FlowStatus::Generating, None),
            FlowState::Previewing(p) => (FlowStatus::Previewing, Some(p.clone())),
        };
        FlowSnapshot {
            flow: self.kind,
            state,
            preview,
        }
    }

    fn ensure_not_generating(&self) -> Result<(), StudioError> {
        if self.is_generating() {
            Err(StudioError::Busy(self.kind))
        } else {
            Ok(())
        }
    }
}
