//! Navigation error types
//!
//! The first three variants describe faults the controller recovers from
//! on its own. They are logged where the recovery happens and never
//! returned from event handling.

use thiserror::Error;

use folio_transition::TransitionId;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("No surface registered for identifier: {0}")]
    UnresolvedIdentifier(String),

    #[error("Animation end never fired for transition {transition} within {timeout_ms}ms")]
    AnimationTimeout {
        transition: TransitionId,
        timeout_ms: u32,
    },

    #[error("History drift suspected at {location}: expected depth {expected}, host reports {actual}")]
    HistoryDriftSuspected {
        location: String,
        expected: usize,
        actual: usize,
    },

    #[error("Location error: {0}")]
    Location(#[from] folio_location::LocationError),

    #[error("Surface error: {0}")]
    Surface(#[from] folio_surface::SurfaceError),

    #[error("History error: {0}")]
    History(#[from] folio_history::HistoryError),

    #[error("Storage error: {0}")]
    Storage(#[from] folio_storage::StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
