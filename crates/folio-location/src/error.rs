//! Location error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocationError {
    #[error("Invalid href: {0}")]
    InvalidHref(String),
}
