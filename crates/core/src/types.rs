/// Entity identifiers are random UUIDs, serialized as strings.
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh identifier for a newly committed entity.
pub fn new_id() -> EntityId {
    uuid::Uuid::new_v4()
}
