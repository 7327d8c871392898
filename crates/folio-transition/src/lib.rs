//! Folio Transitions
//!
//! Sequences the visual swap between two surfaces: declarative `-out`/`-in`
//! animations guarded by a fallback timer, or offset interpolation for
//! gesture-driven slides.

mod easing;
mod orchestrator;
mod resolve;

pub use easing::ease_out_cubic;
pub use orchestrator::{Orchestrator, TransitionId};
pub use resolve::resolve;

/// Fallback delay after which a pending animation is treated as finished
pub const DEFAULT_ANIMATION_TIMEOUT_MS: u32 = 1000;

/// Frames used to interpolate a swipe slide to rest
pub const DEFAULT_SWIPE_STEPS: u32 = 12;
