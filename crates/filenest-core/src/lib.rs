//! # filenest-core
//!
//! Core crate for FileNest. Contains the capability traits, configuration
//! schemas, typed identifiers, shared vocabulary types, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other FileNest crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
