//! Local persistence for the Cameo library.
//!
//! [`LocalStore`] owns the in-memory character and scene collections and
//! mirrors each one, whole, into a [`KeyValueStore`] blob whenever it
//! changes. State is read back once at startup.

pub mod error;
pub mod kv;
pub mod library;

pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use library::{Library, LocalStore, CHARACTERS_KEY, SCENES_KEY};
