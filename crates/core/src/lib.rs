//! Domain model shared by every Cameo crate.
//!
//! Characters, scenes, self-contained image artifacts and the common
//! [`error::CoreError`] type. Nothing here performs I/O.

pub mod character;
pub mod error;
pub mod image;
pub mod scene;
pub mod types;
