//! The character and scene collections and their persistence.
//!
//! Each collection is stored as one JSON array under a stable key and is
//! always rewritten in full. The two collections are independent: a crash
//! between two writes can leave one updated and the other stale, which is
//! tolerable because scenes only reference characters loosely.
//!
//! Encoding and decoding run on the blocking pool; a collection of
//! portraits is many megabytes of base64.

use std::collections::HashSet;
use std::sync::Arc;

use cameo_core::character::Character;
use cameo_core::scene::Scene;
use cameo_core::types::EntityId;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::kv::KeyValueStore;

/// Storage key of the character collection.
pub const CHARACTERS_KEY: &str = "ai_chars";

/// Storage key of the scene collection.
pub const SCENES_KEY: &str = "ai_scenes";

/// Both collections, newest entity first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    pub characters: Vec<Character>,
    pub scenes: Vec<Scene>,
}

/// Owner of the persisted collections.
///
/// Constructed once per process with [`LocalStore::open`]. Every mutation
/// writes the affected collection before updating memory, so a failed
/// write leaves the in-memory view matching what is on disk.
pub struct LocalStore {
    backend: Arc<dyn KeyValueStore>,
    characters: Vec<Character>,
    scenes: Vec<Scene>,
}

impl LocalStore {
    /// Load persisted state from `backend`. Missing keys mean empty
    /// collections; a corrupt blob is an error rather than silently
    /// starting empty and overwriting it later.
    pub async fn open(backend: impl KeyValueStore + 'static) -> Result<Self, StoreError> {
        let backend: Arc<dyn KeyValueStore> = Arc::new(backend);
        let Library { characters, scenes } = read_library(backend.as_ref()).await?;

        tracing::info!(
            characters = characters.len(),
            scenes = scenes.len(),
            "Library loaded",
        );

        Ok(Self {
            backend,
            characters,
            scenes,
        })
    }

    /// Re-read both collections from the backend.
    pub async fn load(&self) -> Result<Library, StoreError> {
        read_library(self.backend.as_ref()).await
    }

    // ---- reads ----

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn character(&self, id: EntityId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn scene(&self, id: EntityId) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    // ---- whole-collection overwrite ----

    /// Replace the character collection and persist it.
    pub async fn replace_characters(
        &mut self,
        characters: Vec<Character>,
    ) -> Result<(), StoreError> {
        ensure_unique("Character", characters.iter().map(|c| c.id))?;
        self.write(CHARACTERS_KEY, characters.clone()).await?;
        self.characters = characters;
        Ok(())
    }

    /// Replace the scene collection and persist it.
    pub async fn replace_scenes(&mut self, scenes: Vec<Scene>) -> Result<(), StoreError> {
        ensure_unique("Scene", scenes.iter().map(|s| s.id))?;
        self.write(SCENES_KEY, scenes.clone()).await?;
        self.scenes = scenes;
        Ok(())
    }

    // ---- mutations ----

    /// Add a character at the front of the collection.
    pub async fn insert_character(&mut self, character: Character) -> Result<(), StoreError> {
        if self.character(character.id).is_some() {
            return Err(StoreError::DuplicateId {
                entity: "Character",
                id: character.id,
            });
        }

        let next: Vec<Character> = std::iter::once(&character)
            .chain(self.characters.iter())
            .cloned()
            .collect();
        self.write(CHARACTERS_KEY, next).await?;
        self.characters.insert(0, character);
        Ok(())
    }

    /// Add a scene at the front of the collection.
    pub async fn insert_scene(&mut self, scene: Scene) -> Result<(), StoreError> {
        if self.scene(scene.id).is_some() {
            return Err(StoreError::DuplicateId {
                entity: "Scene",
                id: scene.id,
            });
        }

        let next: Vec<Scene> = std::iter::once(&scene)
            .chain(self.scenes.iter())
            .cloned()
            .collect();
        self.write(SCENES_KEY, next).await?;
        self.scenes.insert(0, scene);
        Ok(())
    }

    /// Remove a character. Scenes referencing it are left untouched.
    ///
    /// Returns `false` (and writes nothing) when no character has `id`.
    pub async fn delete_character(&mut self, id: EntityId) -> Result<bool, StoreError> {
        if self.character(id).is_none() {
            return Ok(false);
        }

        let next: Vec<Character> = self
            .characters
            .iter()
            .filter(|c| c.id != id)
            .cloned()
            .collect();
        self.write(CHARACTERS_KEY, next).await?;
        self.characters.retain(|c| c.id != id);
        Ok(true)
    }

    /// Remove a scene. Returns `false` when no scene has `id`.
    pub async fn delete_scene(&mut self, id: EntityId) -> Result<bool, StoreError> {
        if self.scene(id).is_none() {
            return Ok(false);
        }

        let next: Vec<Scene> = self.scenes.iter().filter(|s| s.id != id).cloned().collect();
        self.write(SCENES_KEY, next).await?;
        self.scenes.retain(|s| s.id != id);
        Ok(true)
    }

    // ---- private helpers ----

    async fn write<T>(&self, key: &str, collection: Vec<T>) -> Result<(), StoreError>
    where
        T: Serialize + Send + 'static,
    {
        let json =
            tokio::task::spawn_blocking(move || serde_json::to_string(&collection)).await??;
        self.backend.set(key, &json).await?;
        tracing::debug!(key, bytes = json.len(), "Collection persisted");
        Ok(())
    }
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("characters", &self.characters.len())
            .field("scenes", &self.scenes.len())
            .finish_non_exhaustive()
    }
}

async fn read_library(backend: &dyn KeyValueStore) -> Result<Library, StoreError> {
    Ok(Library {
        characters: read_collection(backend, CHARACTERS_KEY).await?,
        scenes: read_collection(backend, SCENES_KEY).await?,
    })
}

async fn read_collection<T>(backend: &dyn KeyValueStore, key: &str) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned + Send + 'static,
{
    match backend.get(key).await? {
        Some(json) => {
            let decode = move || serde_json::from_str::<Vec<T>>(&json);
            Ok(tokio::task::spawn_blocking(decode).await??)
        }
        None => Ok(Vec::new()),
    }
}

fn ensure_unique(
    entity: &'static str,
    ids: impl Iterator<Item = EntityId>,
) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(StoreError::DuplicateId { entity, id });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use cameo_core::image::ImageArtifact;
    use cameo_core::scene::AspectRatio;

    use super::*;
    use crate::kv::{FileStore, MemoryStore};

    fn image(payload: &str) -> ImageArtifact {
        ImageArtifact::from_base64("image/png", payload).unwrap()
    }

    fn character(name: &str) -> Character {
        Character::new(Some(name), image("Q0hBUg=="), Some(format!("{name} portrait")))
    }

    fn scene(ids: Vec<EntityId>) -> Scene {
        Scene::new(image("U0NFTkU="), "a forest".into(), ids, AspectRatio::Landscape)
    }

    #[tokio::test]
    async fn empty_backend_loads_empty_collections() {
        let store = LocalStore::open(MemoryStore::new()).await.unwrap();
        assert!(store.characters().is_empty());
        assert!(store.scenes().is_empty());
        assert_eq!(store.load().await.unwrap(), Library::default());
    }

    #[tokio::test]
    async fn replace_characters_survives_restart() {
        let backend = MemoryStore::new();
        let collection = vec![character("Vix"), character("Bram")];

        let mut store = LocalStore::open(backend.clone()).await.unwrap();
        store.replace_characters(collection.clone()).await.unwrap();

        let reopened = LocalStore::open(backend).await.unwrap();
        assert_eq!(reopened.characters(), collection.as_slice());
        assert!(reopened.scenes().is_empty());
    }

    #[tokio::test]
    async fn replace_scenes_survives_restart_on_disk() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let collection = vec![scene(vec![]), scene(vec![EntityId::new_v4()])];

        let mut store = LocalStore::open(FileStore::new(dir.path())).await.unwrap();
        store.replace_scenes(collection.clone()).await.unwrap();

        let reopened = LocalStore::open(FileStore::new(dir.path())).await.unwrap();
        assert_eq!(reopened.load().await.unwrap().scenes, collection);
    }

    #[tokio::test]
    async fn insert_places_newest_first() {
        let mut store = LocalStore::open(MemoryStore::new()).await.unwrap();
        let first = character("First");
        let second = character("Second");

        store.insert_character(first.clone()).await.unwrap();
        store.insert_character(second.clone()).await.unwrap();

        let names: Vec<&str> = store.characters().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Second", "First"]);
        assert_eq!(store.load().await.unwrap().characters, vec![second, first]);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_ids() {
        let mut store = LocalStore::open(MemoryStore::new()).await.unwrap();
        let c = character("Vix");
        store.insert_character(c.clone()).await.unwrap();

        assert_matches!(
            store.insert_character(c).await,
            Err(StoreError::DuplicateId { entity: "Character", .. })
        );
        assert_eq!(store.characters().len(), 1);
    }

    #[tokio::test]
    async fn replace_rejects_duplicate_ids_without_writing() {
        let backend = MemoryStore::new();
        let mut store = LocalStore::open(backend.clone()).await.unwrap();
        let c = character("Vix");

        let result = store.replace_characters(vec![c.clone(), c]).await;
        assert_matches!(result, Err(StoreError::DuplicateId { .. }));
        assert_eq!(backend.get(CHARACTERS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn deleting_a_character_keeps_scene_references() {
        let mut store = LocalStore::open(MemoryStore::new()).await.unwrap();
        let vix = character("Vix");
        let bram = character("Bram");
        store.insert_character(vix.clone()).await.unwrap();
        store.insert_character(bram.clone()).await.unwrap();
        let s = scene(vec![vix.id, bram.id]);
        store.insert_scene(s.clone()).await.unwrap();

        assert!(store.delete_character(vix.id).await.unwrap());

        assert!(store.character(vix.id).is_none());
        assert_eq!(store.characters().len(), 1);
        assert_eq!(store.scene(s.id).unwrap().character_ids, vec![vix.id, bram.id]);
        assert_eq!(store.load().await.unwrap().scenes[0].character_ids, vec![vix.id, bram.id]);
    }

    #[tokio::test]
    async fn deleting_unknown_ids_reports_false() {
        let mut store = LocalStore::open(MemoryStore::new()).await.unwrap();
        assert!(!store.delete_character(EntityId::new_v4()).await.unwrap());
        assert!(!store.delete_scene(EntityId::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn delete_scene_persists_remaining_collection() {
        let backend = MemoryStore::new();
        let mut store = LocalStore::open(backend.clone()).await.unwrap();
        let keep = scene(vec![]);
        let removed = scene(vec![]);
        store.insert_scene(keep.clone()).await.unwrap();
        store.insert_scene(removed.clone()).await.unwrap();

        assert!(store.delete_scene(removed.id).await.unwrap());

        let reopened = LocalStore::open(backend).await.unwrap();
        assert_eq!(reopened.scenes(), [keep]);
    }

    #[tokio::test]
    async fn corrupt_blob_fails_to_open() {
        let backend = MemoryStore::new();
        backend.set(CHARACTERS_KEY, "{not json").await.unwrap();

        assert_matches!(
            LocalStore::open(backend).await,
            Err(StoreError::Serialization(_))
        );
    }

    #[tokio::test]
    async fn collections_are_persisted_independently() {
        let backend = MemoryStore::new();
        let mut store = LocalStore::open(backend.clone()).await.unwrap();
        store.insert_character(character("Vix")).await.unwrap();

        assert!(backend.get(CHARACTERS_KEY).await.unwrap().is_some());
        assert_eq!(backend.get(SCENES_KEY).await.unwrap(), None);
    }
}
