//! History error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Location error: {0}")]
    Location(#[from] folio_location::LocationError),

    #[error("Storage error: {0}")]
    Storage(#[from] folio_storage::StorageError),
}
