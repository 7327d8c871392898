//! Surface error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Surface not found: {0}")]
    NotFound(String),

    #[error("Surface already registered: {0}")]
    Duplicate(String),

    #[error("Invalid surface identifier: {0:?}")]
    InvalidIdentifier(String),
}
