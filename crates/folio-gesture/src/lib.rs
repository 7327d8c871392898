//! Folio Gestures
//!
//! Turns pointer coordinates into swipe navigation. A page swipe previews
//! the neighbouring page beside the current one and commits to it; a modal
//! swipe drags the modal panel back the way it came in and dismisses it.

mod recognizer;
mod state;

pub use recognizer::{SwipeRecognizer, DEFAULT_TOUCH_DEBOUNCE_MS};
pub use state::{GestureMode, GestureState, PointerSource, SwipeOutcome};
