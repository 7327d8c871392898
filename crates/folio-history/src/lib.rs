//! Folio History Reconciliation
//!
//! Browsers only expose "the user went back" as a symptom (the navigation
//! depth shrank), never as an event with semantics. The reconciler keeps a
//! shadow of the host's back/forward stack and classifies each accepted
//! page navigation:
//! 1. Fresh forward navigation → append
//! 2. Immediate back (entry two below the top) → pop, correct the host if
//!    the depth did not shrink on its own
//! 3. Jump back (unique mode, entry deeper in the stack) → truncate, correct

mod error;
mod host;
mod reconciler;

pub use error::HistoryError;
pub use host::{HistoryHost, MemoryHistory, NavigationOrigin};
pub use reconciler::{Drift, HistoryEntry, HistoryReconciler, Reconciliation};

pub type Result<T> = std::result::Result<T, HistoryError>;
