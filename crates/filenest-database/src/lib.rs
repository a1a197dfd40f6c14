//! # filenest-database
//!
//! Metadata persistence for FileNest: the [`store::MetadataStore`]
//! capability trait, its PostgreSQL implementation built from per-entity
//! repositories, connection pool management, the migration runner, and an
//! in-memory implementation used by tests and embedded callers.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryMetadataStore;
pub use store::{MetadataStore, PgMetadataStore};
