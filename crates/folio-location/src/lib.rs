//! Folio Location Codec
//!
//! The routing string lives in the URL fragment:
//! - `#identifier` → show the surface named `identifier`
//! - `#identifier?search` → same, with an opaque search payload
//! - `#` or no fragment → no identifier (caller falls back)

mod codec;
mod error;
mod href;

pub use codec::{decode, encode, RoutingString};
pub use error::LocationError;
pub use href::Href;

pub type Result<T> = std::result::Result<T, LocationError>;
