//! Gesture state

use folio_surface::{DismissDirection, Direction, Offset, Surface, SurfaceId, TransitionKind};
use serde::{Deserialize, Serialize};

/// Where a pointer event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerSource {
    Touch,
    Mouse,
}

/// What the gesture drags
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureMode {
    /// Current page plus a neighbour candidate, horizontal only
    Page,
    /// The open modal, along its dismiss direction only
    Modal(DismissDirection),
}

/// An active gesture, from pointer-down to release
#[derive(Debug, Clone)]
pub struct GestureState {
    pub source: PointerSource,
    pub mode: GestureMode,
    /// Pointer position at gesture start
    pub start: Offset,
    /// Surface under the pointer at gesture start
    pub target: Surface,
    pub axis_locked: bool,
    pub direction: Option<Direction>,
    /// Pointer travel since start
    pub delta: Offset,
    /// Neighbour previewed beside a dragged page
    pub candidate: Option<Surface>,
}

impl GestureState {
    pub fn new(source: PointerSource, mode: GestureMode, start: Offset, target: Surface) -> Self {
        Self {
            source,
            mode,
            start,
            target,
            axis_locked: false,
            direction: None,
            delta: Offset::ZERO,
            candidate: None,
        }
    }

    pub fn candidate_id(&self) -> Option<&SurfaceId> {
        self.candidate.as_ref().map(|c| &c.id)
    }
}

/// Result of releasing the pointer
#[derive(Debug, Clone)]
pub enum SwipeOutcome {
    /// No gesture was being tracked
    Ignored,
    /// Surfaces are animating back to rest
    Cancelled,
    /// Navigate to `candidate` with `transition`, continuing from `residual`
    CommitPage {
        candidate: Surface,
        direction: Direction,
        transition: TransitionKind,
        residual: Offset,
    },
    /// Close `modal`, sliding it out from `residual`
    DismissModal { modal: SurfaceId, residual: Offset },
}

impl SwipeOutcome {
    pub fn is_commit(&self) -> bool {
        matches!(
            self,
            SwipeOutcome::CommitPage { .. } | SwipeOutcome::DismissModal { .. }
        )
    }
}

/// Transition used when a page swipe commits in `direction`
pub fn swipe_transition(direction: Direction) -> TransitionKind {
    match direction {
        Direction::Next => TransitionKind::Swipe,
        Direction::Previous => TransitionKind::SwipeReverse,
    }
}
