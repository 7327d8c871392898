//! Folio Storage Layer
//!
//! SQLite-based persistence for the shadow history stack and settings.
//! Writes that replace a whole stack are transactional.

mod database;
mod error;
mod migrations;

pub use database::{Database, StoredEntry};
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
