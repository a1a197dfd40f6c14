//! # filenest-entity
//!
//! Domain entity models for FileNest. Every struct in this crate
//! represents a metadata-store row or a domain value object. Row entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and `sqlx::FromRow`.

pub mod file;
pub mod folder;

pub use file::{File, FileRecord, FileVersion, NewFileRecord, NewFileVersion};
pub use folder::{Folder, NewFolder};
