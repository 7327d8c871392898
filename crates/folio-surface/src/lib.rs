//! Folio Surfaces
//!
//! A surface is the unit of navigable UI: a `Page` (mutually exclusive with
//! other pages) or a `Modal` (layered above the current page).
//! The host owns creation and deletion; the engine only reads the registry
//! and drives visibility through the [`Stage`] seam.

mod error;
mod kind;
mod registry;
mod stage;
mod surface;
mod visibility;

pub use error::SurfaceError;
pub use kind::{Animation, AnimationPhase, Axis, DismissDirection, TransitionKind};
pub use registry::{Registry, SurfaceRegistry};
pub use stage::{HeadlessStage, Offset, Stage, StageOp, Viewport};
pub use surface::{Direction, Surface, SurfaceHooks, SurfaceId, SurfaceKind};
pub use visibility::Visibility;

pub type Result<T> = std::result::Result<T, SurfaceError>;
