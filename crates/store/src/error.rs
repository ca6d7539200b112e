use cameo_core::types::EntityId;

/// Errors from the local store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing a blob failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted blob could not be encoded or decoded.
    #[error("Corrupt or unserializable collection: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Encoding or decoding on the blocking pool was cancelled or panicked.
    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// A collection would contain two entities with the same id.
    #[error("Duplicate {entity} id {id}")]
    DuplicateId { entity: &'static str, id: EntityId },
}
