//! Folio Core
//!
//! The navigation controller: keeps the visible pages and modals in step
//! with the location fragment and the host's back/forward stack.
//! The host owns the document; the engine reaches it only through the
//! [`Registry`], [`HistoryHost`] and [`Stage`] seams.

mod config;
mod error;
mod hooks;
mod navigator;
mod state;

pub use config::{Config, SwipeConfig};
pub use error::NavigationError;
pub use hooks::{LocationChange, NavigationHooks};
pub use navigator::Navigator;
pub use state::{ModalSession, NavigationPhase, NavigationState, PendingSuppression};

// Re-export the engine components
pub use folio_gesture::{GestureState, PointerSource, SwipeOutcome, SwipeRecognizer};
pub use folio_history::{
    HistoryEntry, HistoryError, HistoryHost, HistoryReconciler, MemoryHistory, NavigationOrigin,
    Reconciliation,
};
pub use folio_location::{decode, encode, Href, LocationError, RoutingString};
pub use folio_storage::{Database, StorageError};
pub use folio_surface::{
    Animation, Direction, HeadlessStage, Offset, Registry, Stage, Surface, SurfaceError,
    SurfaceHooks, SurfaceId, SurfaceKind, SurfaceRegistry, TransitionKind, Viewport, Visibility,
};
pub use folio_transition::{Orchestrator, TransitionId};

pub type Result<T> = std::result::Result<T, NavigationError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
