//! Swipe Gesture Recognizer
//!
//! ```text
//! Idle → Tracking(unlocked) → Tracking(locked, dir) → Committed | Cancelled → Idle
//! ```
//!
//! The recognizer only moves surfaces for preview. Committing is reported
//! back as a [`SwipeOutcome`]; the caller performs the navigation.

use folio_surface::{Axis, Direction, DismissDirection, Offset, Registry, Stage, Surface, Viewport};
use folio_transition::Orchestrator;

use crate::state::{swipe_transition, GestureMode, GestureState, PointerSource, SwipeOutcome};

/// Window after a touch gesture in which a mouse pointer-down is treated
/// as the same physical touch
pub const DEFAULT_TOUCH_DEBOUNCE_MS: u32 = 600;

/// Single-gesture swipe recognizer
#[derive(Debug)]
pub struct SwipeRecognizer {
    state: Option<GestureState>,
    debounce_ms: f64,
    last_touch_end_ms: Option<f64>,
}

impl SwipeRecognizer {
    pub fn new(debounce_ms: u32) -> Self {
        Self {
            state: None,
            debounce_ms: f64::from(debounce_ms),
            last_touch_end_ms: None,
        }
    }

    pub fn state(&self) -> Option<&GestureState> {
        self.state.as_ref()
    }

    pub fn is_tracking(&self) -> bool {
        self.state.is_some()
    }

    /// Start dragging the current page. Returns false if the pointer-down
    /// was ignored.
    pub fn begin_page(
        &mut self,
        source: PointerSource,
        x: f64,
        y: f64,
        now_ms: f64,
        current: Surface,
    ) -> bool {
        self.begin(source, GestureMode::Page, x, y, now_ms, current)
    }

    /// Start dragging an open modal along `dismiss`.
    pub fn begin_modal(
        &mut self,
        source: PointerSource,
        x: f64,
        y: f64,
        now_ms: f64,
        modal: Surface,
        dismiss: DismissDirection,
    ) -> bool {
        self.begin(source, GestureMode::Modal(dismiss), x, y, now_ms, modal)
    }

    fn begin(
        &mut self,
        source: PointerSource,
        mode: GestureMode,
        x: f64,
        y: f64,
        now_ms: f64,
        target: Surface,
    ) -> bool {
        if self.state.is_some() {
            tracing::trace!("Ignoring pointer down during an active gesture");
            return false;
        }
        if source == PointerSource::Mouse {
            if let Some(touch_end) = self.last_touch_end_ms {
                if now_ms - touch_end < self.debounce_ms {
                    tracing::trace!(
                        since_touch_ms = now_ms - touch_end,
                        "Ignoring mouse pointer down after touch"
                    );
                    return false;
                }
            }
        }

        tracing::debug!(source = ?source, target = %target.id, "Gesture started");
        self.state = Some(GestureState::new(source, mode, Offset::new(x, y), target));
        true
    }

    /// Pointer moved to `(x, y)`.
    pub fn update(
        &mut self,
        x: f64,
        y: f64,
        registry: &dyn Registry,
        stage: &mut dyn Stage,
        orchestrator: &mut Orchestrator,
    ) {
        let viewport = stage.viewport();
        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.delta = Offset::new(x, y) - state.start;

        match state.mode {
            GestureMode::Page => track_page(state, registry, stage, orchestrator, viewport),
            GestureMode::Modal(dismiss) => track_modal(state, dismiss, stage),
        }
    }

    /// Pointer released: commit or snap back.
    pub fn release(
        &mut self,
        now_ms: f64,
        stage: &dyn Stage,
        orchestrator: &mut Orchestrator,
    ) -> SwipeOutcome {
        let Some(state) = self.state.take() else {
            return SwipeOutcome::Ignored;
        };
        if state.source == PointerSource::Touch {
            self.last_touch_end_ms = Some(now_ms);
        }

        let viewport = stage.viewport();
        match state.mode {
            GestureMode::Page => release_page(state, viewport, orchestrator),
            GestureMode::Modal(dismiss) => release_modal(state, dismiss, viewport, orchestrator),
        }
    }

    /// Drop the active gesture without animating, restoring rest offsets.
    pub fn abort(&mut self, now_ms: f64, stage: &mut dyn Stage, orchestrator: &mut Orchestrator) {
        let Some(state) = self.state.take() else {
            return;
        };
        if state.source == PointerSource::Touch {
            self.last_touch_end_ms = Some(now_ms);
        }
        if !state.axis_locked {
            return;
        }

        tracing::debug!(target = %state.target.id, "Gesture aborted");
        stage.set_offset(&state.target.id, Offset::ZERO);
        if let Some(candidate) = &state.candidate {
            orchestrator.retract(stage, &candidate.id);
        }
    }
}

impl Default for SwipeRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_TOUCH_DEBOUNCE_MS)
    }
}

/// Rest offset of a candidate previewed in `direction`
fn anchor(direction: Direction, width: f64) -> f64 {
    match direction {
        Direction::Previous => -width,
        Direction::Next => width,
    }
}

fn drag_direction(dx: f64) -> Direction {
    if dx > 0.0 {
        Direction::Previous
    } else {
        Direction::Next
    }
}

fn cross_axis(axis: Axis) -> Axis {
    match axis {
        Axis::Horizontal => Axis::Vertical,
        Axis::Vertical => Axis::Horizontal,
    }
}

fn track_page(
    state: &mut GestureState,
    registry: &dyn Registry,
    stage: &mut dyn Stage,
    orchestrator: &mut Orchestrator,
    viewport: Viewport,
) {
    let dx = state.delta.x;

    if !state.axis_locked {
        if dx.abs() <= 2.0 * state.delta.y.abs() {
            return;
        }
        let direction = drag_direction(dx);
        let Some(candidate) = registry.neighbor(&state.target, direction) else {
            tracing::trace!(direction = ?direction, "No neighbour to swipe to");
            return;
        };
        tracing::debug!(
            direction = ?direction,
            candidate = %candidate.id,
            "Swipe axis locked"
        );
        state.axis_locked = true;
        state.direction = Some(direction);
        state.candidate = Some(candidate);
    } else if dx != 0.0 {
        let direction = drag_direction(dx);
        if state.direction != Some(direction) {
            if let Some(previous) = state.candidate.take() {
                orchestrator.retract(stage, &previous.id);
            }
            state.candidate = registry.neighbor(&state.target, direction);
            state.direction = Some(direction);
            tracing::debug!(
                direction = ?direction,
                candidate = ?state.candidate_id().map(|id| id.as_str()),
                "Swipe crossed centre"
            );
        }
    }

    stage.set_offset(&state.target.id, Offset::horizontal(dx));
    if let (Some(candidate), Some(direction)) = (&state.candidate, state.direction) {
        let offset = Offset::horizontal(anchor(direction, viewport.width) + dx);
        orchestrator.place(stage, &candidate.id, offset);
    }
}

fn track_modal(state: &mut GestureState, dismiss: DismissDirection, stage: &mut dyn Stage) {
    let along = state.delta.component(dismiss.axis) * dismiss.sign;

    if !state.axis_locked {
        let across = state.delta.component(cross_axis(dismiss.axis)).abs();
        if along <= 0.0 || along <= 2.0 * across {
            return;
        }
        tracing::debug!(modal = %state.target.id, "Modal swipe locked");
        state.axis_locked = true;
    }

    let offset = Offset::along(dismiss.axis, along.max(0.0) * dismiss.sign);
    stage.set_offset(&state.target.id, offset);
}

fn release_page(
    state: GestureState,
    viewport: Viewport,
    orchestrator: &mut Orchestrator,
) -> SwipeOutcome {
    if !state.axis_locked {
        return SwipeOutcome::Cancelled;
    }

    let dx = state.delta.x;
    let threshold = viewport.width / 4.0;

    match (state.candidate, state.direction) {
        (Some(candidate), Some(direction)) if dx.abs() > threshold => {
            tracing::info!(
                candidate = %candidate.id,
                direction = ?direction,
                dx,
                "Swipe committed"
            );
            SwipeOutcome::CommitPage {
                candidate,
                direction,
                transition: swipe_transition(direction),
                residual: Offset::horizontal(dx),
            }
        }
        (candidate, direction) => {
            let mut tracks = vec![(state.target.id.clone(), Offset::horizontal(dx), Offset::ZERO)];
            let hidden = match (candidate, direction) {
                (Some(candidate), Some(direction)) => {
                    let rest = anchor(direction, viewport.width);
                    tracks.push((
                        candidate.id.clone(),
                        Offset::horizontal(rest + dx),
                        Offset::horizontal(rest),
                    ));
                    Some(candidate.id)
                }
                _ => None,
            };
            tracing::debug!(dx, threshold, "Swipe cancelled");
            orchestrator.settle(tracks, hidden);
            SwipeOutcome::Cancelled
        }
    }
}

fn release_modal(
    state: GestureState,
    dismiss: DismissDirection,
    viewport: Viewport,
    orchestrator: &mut Orchestrator,
) -> SwipeOutcome {
    if !state.axis_locked {
        return SwipeOutcome::Cancelled;
    }

    let along = (state.delta.component(dismiss.axis) * dismiss.sign).max(0.0);
    let residual = Offset::along(dismiss.axis, along * dismiss.sign);

    if along > viewport.extent(dismiss.axis) / 4.0 {
        tracing::info!(modal = %state.target.id, along, "Modal swipe committed");
        return SwipeOutcome::DismissModal {
            modal: state.target.id,
            residual,
        };
    }

    tracing::debug!(modal = %state.target.id, along, "Modal swipe cancelled");
    orchestrator.settle(vec![(state.target.id, residual, Offset::ZERO)], None);
    SwipeOutcome::Cancelled
}
