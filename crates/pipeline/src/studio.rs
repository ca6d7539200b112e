//! The [`Studio`] controller.
//!
//! Each flow's state lives behind its own short-lived mutex. The mutex is
//! released before the generation call is awaited; the `Generating` state
//! is what keeps a second call out. Generation runs in a spawned task so a
//! caller that goes away does not strand the flow in `Generating`.
//!
//! Lock order, where two are held: flow, then store.

use std::collections::HashSet;
use std::sync::Arc;

use cameo_core::character::Character;
use cameo_core::error::CoreError;
use cameo_core::image::ImageArtifact;
use cameo_core::scene::{AspectRatio, Scene};
use cameo_core::types::EntityId;
use cameo_genai::{ImageGenerator, SceneCharacter};
use cameo_store::LocalStore;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::StudioError;
use crate::export::Export;
use crate::flow::{CharacterDraft, Flow, FlowKind, FlowSnapshot, Preview, SceneDraft};

/// Shared handle to the library and both creative flows.
///
/// Cheap to clone; all clones drive the same state.
#[derive(Clone)]
pub struct Studio {
    inner: Arc<Inner>,
}

struct Inner {
    generator: Arc<dyn ImageGenerator>,
    store: Mutex<LocalStore>,
    character_flow: Mutex<Flow<CharacterDraft>>,
    scene_flow: Mutex<Flow<SceneDraft>>,
}

impl Studio {
    pub fn new(generator: Arc<dyn ImageGenerator>, store: LocalStore) -> Self {
        Self {
            inner: Arc::new(Inner {
                generator,
                store: Mutex::new(store),
                character_flow: Mutex::new(Flow::new(FlowKind::Character)),
                scene_flow: Mutex::new(Flow::new(FlowKind::Scene)),
            }),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.inner.generator.has_credential()
    }

    // -----------------------------------------------------------------------
    // Library
    // -----------------------------------------------------------------------

    /// All saved characters, newest first.
    pub async fn characters(&self) -> Vec<Character> {
        self.inner.store.lock().await.characters().to_vec()
    }

    /// All saved scenes, newest first.
    pub async fn scenes(&self) -> Vec<Scene> {
        self.inner.store.lock().await.scenes().to_vec()
    }

    pub async fn character(&self, id: EntityId) -> Result<Character, StudioError> {
        self.inner
            .store
            .lock()
            .await
            .character(id)
            .cloned()
            .ok_or_else(|| character_not_found(id))
    }

    pub async fn scene(&self, id: EntityId) -> Result<Scene, StudioError> {
        self.inner
            .store
            .lock()
            .await
            .scene(id)
            .cloned()
            .ok_or_else(|| scene_not_found(id))
    }

    /// Delete a character. Scenes that reference it keep the stale id.
    pub async fn delete_character(&self, id: EntityId) -> Result<(), StudioError> {
        if !self.inner.store.lock().await.delete_character(id).await? {
            return Err(character_not_found(id));
        }
        tracing::info!(%id, "Character deleted");
        Ok(())
    }

    pub async fn delete_scene(&self, id: EntityId) -> Result<(), StudioError> {
        if !self.inner.store.lock().await.delete_scene(id).await? {
            return Err(scene_not_found(id));
        }
        tracing::info!(%id, "Scene deleted");
        Ok(())
    }

    pub async fn export_character(&self, id: EntityId) -> Result<Export, StudioError> {
        let character = self.character(id).await?;
        Ok(Export::character(&character)?)
    }

    pub async fn export_scene(&self, id: EntityId) -> Result<Export, StudioError> {
        let scene = self.scene(id).await?;
        Ok(Export::scene(&scene)?)
    }

    // -----------------------------------------------------------------------
    // Character flow
    // -----------------------------------------------------------------------

    pub async fn character_flow(&self) -> FlowSnapshot<CharacterDraft> {
        self.inner.character_flow.lock().await.snapshot()
    }

    /// Generate a portrait from `prompt` and hold it as the character preview.
    pub async fn generate_character(
        &self,
        prompt: &str,
    ) -> Result<FlowSnapshot<CharacterDraft>, StudioError> {
        let prompt = require_text(prompt, "Character prompt")?;
        begin(&self.inner.character_flow).await?;
        tracing::info!(flow = %FlowKind::Character, "Generating character");

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let result = inner.generator.generate_character(&prompt).await;
            let mut flow = inner.character_flow.lock().await;
            settle(&mut flow, result, |image_url| Preview {
                image_url,
                draft: CharacterDraft {
                    prompt: Some(prompt),
                },
            })
        });

        join(&self.inner.character_flow, task).await
    }

    /// Use an uploaded image as the character preview, skipping generation.
    pub async fn upload_character(
        &self,
        image: ImageArtifact,
    ) -> Result<FlowSnapshot<CharacterDraft>, StudioError> {
        let mut flow = self.inner.character_flow.lock().await;
        flow.set_preview(Preview {
            image_url: image,
            draft: CharacterDraft { prompt: None },
        })?;
        tracing::info!(flow = %FlowKind::Character, "Uploaded image staged for preview");
        Ok(flow.snapshot())
    }

    /// Save the character preview under `name` (or the default name).
    pub async fn commit_character(&self, name: Option<&str>) -> Result<Character, StudioError> {
        let mut flow = self.inner.character_flow.lock().await;
        let preview = flow.take_preview()?;
        let character = Character::new(
            name,
            preview.image_url.clone(),
            preview.draft.prompt.clone(),
        );

        let mut store = self.inner.store.lock().await;
        if let Err(e) = store.insert_character(character.clone()).await {
            flow.restore_preview(preview);
            tracing::error!(error = %e, "Failed to save character");
            return Err(e.into());
        }

        tracing::info!(
            id = %character.id,
            name = %character.name,
            total = store.characters().len(),
            "Character committed",
        );
        Ok(character)
    }

    pub async fn discard_character(&self) -> Result<FlowSnapshot<CharacterDraft>, StudioError> {
        discard(&self.inner.character_flow).await
    }

    // -----------------------------------------------------------------------
    // Scene flow
    // -----------------------------------------------------------------------

    pub async fn scene_flow(&self) -> FlowSnapshot<SceneDraft> {
        self.inner.scene_flow.lock().await.snapshot()
    }

    /// Compose the selected characters, in the given order, into a scene.
    pub async fn generate_scene(
        &self,
        prompt: &str,
        mut character_ids: Vec<EntityId>,
        aspect_ratio: AspectRatio,
    ) -> Result<FlowSnapshot<SceneDraft>, StudioError> {
        let prompt = require_text(prompt, "Scene prompt")?;
        if character_ids.is_empty() {
            return Err(CoreError::Validation("Select at least one character".to_string()).into());
        }
        // A repeated selection keeps its first position.
        let mut seen = HashSet::new();
        character_ids.retain(|id| seen.insert(*id));
        let characters = self.scene_characters(&character_ids).await?;

        begin(&self.inner.scene_flow).await?;
        tracing::info!(
            flow = %FlowKind::Scene,
            characters = characters.len(),
            %aspect_ratio,
            "Generating scene",
        );

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let result = inner
                .generator
                .generate_scene(&prompt, &characters, aspect_ratio)
                .await;
            let mut flow = inner.scene_flow.lock().await;
            settle(&mut flow, result, |image_url| Preview {
                image_url,
                draft: SceneDraft {
                    prompt,
                    character_ids,
                    aspect_ratio,
                },
            })
        });

        join(&self.inner.scene_flow, task).await
    }

    /// Regenerate the scene preview with `edit_prompt` applied to it.
    pub async fn edit_scene(&self, edit_prompt: &str) -> Result<FlowSnapshot<SceneDraft>, StudioError> {
        let edit_prompt = require_text(edit_prompt, "Edit prompt")?;
        let base = self.inner.scene_flow.lock().await.start_editing()?;
        tracing::info!(flow = %FlowKind::Scene, "Editing scene preview");

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let result = inner
                .generator
                .edit_scene(&base.image_url, &edit_prompt)
                .await;
            let mut flow = inner.scene_flow.lock().await;
            settle(&mut flow, result, |image_url| Preview {
                image_url,
                draft: base.draft,
            })
        });

        join(&self.inner.scene_flow, task).await
    }

    pub async fn commit_scene(&self) -> Result<Scene, StudioError> {
        let mut flow = self.inner.scene_flow.lock().await;
        let preview = flow.take_preview()?;
        let scene = Scene::new(
            preview.image_url.clone(),
            preview.draft.prompt.clone(),
            preview.draft.character_ids.clone(),
            preview.draft.aspect_ratio,
        );

        let mut store = self.inner.store.lock().await;
        if let Err(e) = store.insert_scene(scene.clone()).await {
            flow.restore_preview(preview);
            tracing::error!(error = %e, "Failed to save scene");
            return Err(e.into());
        }

        tracing::info!(
            id = %scene.id,
            characters = scene.character_ids.len(),
            total = store.scenes().len(),
            "Scene committed",
        );
        Ok(scene)
    }

    pub async fn discard_scene(&self) -> Result<FlowSnapshot<SceneDraft>, StudioError> {
        discard(&self.inner.scene_flow).await
    }

    // ---- private helpers ----

    async fn scene_characters(&self, ids: &[EntityId]) -> Result<Vec<SceneCharacter>, StudioError> {
        let store = self.inner.store.lock().await;
        ids.iter()
            .map(|&id| {
                store
                    .character(id)
                    .map(|c| SceneCharacter {
                        name: c.name.clone(),
                        image: c.image_url.clone(),
                    })
                    .ok_or_else(|| character_not_found(id))
            })
            .collect()
    }
}

/// Trimmed, non-empty user text.
fn require_text(text: &str, what: &str) -> Result<String, StudioError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{what} must not be empty")).into());
    }
    Ok(trimmed.to_string())
}

async fn begin<D: Clone>(flow: &Mutex<Flow<D>>) -> Result<(), StudioError> {
    let mut flow = flow.lock().await;
    flow.start_generating().inspect_err(|_| {
        tracing::warn!(flow = %flow.kind(), "Ignoring generate request while generating");
    })
}

/// Record the outcome of a generation call on its flow.
fn settle<D: Clone>(
    flow: &mut Flow<D>,
    result: Result<ImageArtifact, cameo_genai::GenerationError>,
    to_preview: impl FnOnce(ImageArtifact) -> Preview<D>,
) -> Result<FlowSnapshot<D>, StudioError> {
    match result {
        Ok(image) => {
            flow.finish(Some(to_preview(image)));
            tracing::info!(flow = %flow.kind(), "Preview ready");
            Ok(flow.snapshot())
        }
        Err(e) => {
            flow.finish(None);
            tracing::error!(flow = %flow.kind(), error = %e, "Generation failed");
            Err(e.into())
        }
    }
}

/// Await a generation task. A panicked task still releases its flow.
async fn join<D: Clone>(
    flow: &Mutex<Flow<D>>,
    task: JoinHandle<Result<FlowSnapshot<D>, StudioError>>,
) -> Result<FlowSnapshot<D>, StudioError> {
    match task.await {
        Ok(result) => result,
        Err(e) => {
            let mut flow = flow.lock().await;
            if flow.is_generating() {
                flow.finish(None);
            }
            tracing::error!(flow = %flow.kind(), error = %e, "Generation task aborted");
            Err(StudioError::TaskFailed(e.to_string()))
        }
    }
}

async fn discard<D: Clone>(flow: &Mutex<Flow<D>>) -> Result<FlowSnapshot<D>, StudioError> {
    let mut flow = flow.lock().await;
    if flow.discard()? {
        tracing::info!(flow = %flow.kind(), "Preview discarded");
    }
    Ok(flow.snapshot())
}

fn character_not_found(id: EntityId) -> StudioError {
    CoreError::NotFound {
        entity: "Character",
        id,
    }
    .into()
}

fn scene_not_found(id: EntityId) -> StudioError {
    CoreError::NotFound { entity: "Scene", id }.into()
}
