//! Transition Orchestrator
//!
//! Every swap is a small state machine:
//!
//! ```text
//! AnimatingOut ──(animation end | fallback timer)──▶ AnimatingIn ──▶ Done
//! Sliding ──(one step per tick)──▶ Done
//! ```
//!
//! Swaps are not queued. A swap started while another is in flight claims
//! its elements, and the older transition leaves claimed elements alone
//! from then on. The older transition still runs to completion on its own
//! fallback timer, so a rapid double-switch can leave two transitions
//! interleaving on the stage for up to one timeout.

use std::collections::HashMap;

use folio_surface::{Animation, Offset, Stage, SurfaceId, TransitionKind, Visibility};

use crate::easing::ease_out_cubic;
use crate::{DEFAULT_ANIMATION_TIMEOUT_MS, DEFAULT_SWIPE_STEPS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(u64);

impl std::fmt::Display for TransitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    AnimatingOut { deadline_ms: f64 },
    AnimatingIn { deadline_ms: f64 },
    Sliding { step: u32 },
}

impl Phase {
    fn as_str(&self) -> &'static str {
        match self {
            Phase::AnimatingOut { .. } => "animating_out",
            Phase::AnimatingIn { .. } => "animating_in",
            Phase::Sliding { .. } => "sliding",
        }
    }
}

#[derive(Debug, Clone)]
struct Track {
    id: SurfaceId,
    from: Offset,
    to: Offset,
}

#[derive(Debug, Clone)]
struct Transition {
    id: TransitionId,
    kind: TransitionKind,
    outgoing: Option<SurfaceId>,
    incoming: Option<SurfaceId>,
    phase: Phase,
    tracks: Vec<Track>,
    hide_at_end: Option<SurfaceId>,
}

/// Drives surface swaps on a [`Stage`].
///
/// Time only advances through [`Orchestrator::tick`]; the host calls it
/// once per frame while [`Orchestrator::is_idle`] is false.
#[derive(Debug)]
pub struct Orchestrator {
    transitions: Vec<Transition>,
    owners: HashMap<SurfaceId, TransitionId>,
    visibility: HashMap<SurfaceId, Visibility>,
    now_ms: f64,
    timeout_ms: f64,
    steps: u32,
    next_id: u64,
}

impl Orchestrator {
    pub fn new(timeout_ms: u32, steps: u32) -> Self {
        Self {
            transitions: Vec::new(),
            owners: HashMap::new(),
            visibility: HashMap::new(),
            now_ms: 0.0,
            timeout_ms: f64::from(timeout_ms),
            steps: steps.max(1),
            next_id: 0,
        }
    }

    /// Swap `outgoing` for `incoming`.
    ///
    /// `residual` is the offset a gesture already dragged the surfaces by;
    /// only swipe kinds use it. Returns `None` when the swap completed
    /// synchronously.
    pub fn swap(
        &mut self,
        stage: &mut dyn Stage,
        outgoing: Option<&SurfaceId>,
        incoming: Option<&SurfaceId>,
        kind: TransitionKind,
        residual: Offset,
    ) -> Option<TransitionId> {
        if outgoing.is_some() && outgoing == incoming {
            return None;
        }

        if !kind.is_animated() {
            if let Some(out) = outgoing {
                self.release(out);
                stage.clear_animation(out);
                stage.hide(out);
                stage.set_offset(out, Offset::ZERO);
                self.set_visibility(out, Visibility::Hidden);
            }
            if let Some(inc) = incoming {
                self.release(inc);
                stage.clear_animation(inc);
                stage.set_offset(inc, Offset::ZERO);
                stage.show(inc);
                self.set_visibility(inc, Visibility::Shown);
            }
            tracing::debug!(
                outgoing = ?outgoing.map(SurfaceId::as_str),
                incoming = ?incoming.map(SurfaceId::as_str),
                "Swapped surfaces without animation"
            );
            return None;
        }

        let id = self.allocate();
        for element in outgoing.into_iter().chain(incoming) {
            self.claim(element, id);
        }

        let mut transition = Transition {
            id,
            kind,
            outgoing: outgoing.cloned(),
            incoming: incoming.cloned(),
            phase: Phase::Sliding { step: 0 },
            tracks: Vec::new(),
            hide_at_end: None,
        };

        tracing::debug!(
            transition = %id,
            kind = %kind,
            outgoing = ?outgoing.map(SurfaceId::as_str),
            incoming = ?incoming.map(SurfaceId::as_str),
            "Starting transition"
        );

        if kind.is_swipe() {
            let width = stage.viewport().width;
            let sign = if kind == TransitionKind::Swipe { 1.0 } else { -1.0 };

            if let Some(out) = outgoing {
                stage.clear_animation(out);
                self.set_visibility(out, Visibility::Leaving);
                transition.tracks.push(Track {
                    id: out.clone(),
                    from: residual,
                    to: Offset::horizontal(-sign * width),
                });
                transition.hide_at_end = Some(out.clone());
            }
            if let Some(inc) = incoming {
                let from = residual + Offset::horizontal(sign * width);
                stage.clear_animation(inc);
                stage.set_offset(inc, from);
                stage.show(inc);
                self.set_visibility(inc, Visibility::Entering);
                transition.tracks.push(Track {
                    id: inc.clone(),
                    from,
                    to: Offset::ZERO,
                });
            }
            self.transitions.push(transition);
            return Some(id);
        }

        match outgoing {
            Some(out) if self.visibility(out).is_displayed() => {
                stage.set_offset(out, Offset::ZERO);
                stage.start_animation(out, Animation::exit(kind));
                self.set_visibility(out, Visibility::Leaving);
                transition.phase = Phase::AnimatingOut {
                    deadline_ms: self.now_ms + self.timeout_ms,
                };
            }
            _ => {
                if !self.begin_enter(stage, &mut transition) {
                    self.finish(&transition);
                    return None;
                }
            }
        }

        self.transitions.push(transition);
        Some(id)
    }

    /// Animation-end event for `id`. Returns true if it advanced a
    /// transition; stale and unrelated events are ignored.
    pub fn animation_finished(&mut self, stage: &mut dyn Stage, id: &SurfaceId) -> bool {
        let Some(&owner) = self.owners.get(id) else {
            tracing::trace!(surface = %id, "Ignoring animation end with no listener");
            return false;
        };
        let Some(pos) = self.position(owner) else {
            return false;
        };

        let transition = &self.transitions[pos];
        let waiting = match transition.phase {
            Phase::AnimatingOut { .. } => transition.outgoing.as_ref() == Some(id),
            Phase::AnimatingIn { .. } => transition.incoming.as_ref() == Some(id),
            Phase::Sliding { .. } => false,
        };
        if !waiting {
            tracing::trace!(
                surface = %id,
                transition = %owner,
                phase = transition.phase.as_str(),
                "Ignoring animation end outside a wait"
            );
            return false;
        }

        self.advance(stage, pos, false);
        true
    }

    /// Advance the clock: step slides and fire expired fallback timers.
    ///
    /// Returns the transitions whose fallback timer fired.
    pub fn tick(&mut self, stage: &mut dyn Stage, now_ms: f64) -> Vec<TransitionId> {
        self.now_ms = now_ms;
        let mut timed_out = Vec::new();

        let ids: Vec<TransitionId> = self.transitions.iter().map(|t| t.id).collect();
        for id in ids {
            let Some(pos) = self.position(id) else {
                continue;
            };
            let phase = self.transitions[pos].phase;
            match phase {
                Phase::AnimatingOut { deadline_ms } | Phase::AnimatingIn { deadline_ms }
                    if now_ms >= deadline_ms =>
                {
                    timed_out.push(id);
                    self.advance(stage, pos, true);
                }
                Phase::Sliding { .. } => self.step_slide(stage, pos),
                _ => {}
            }
        }

        timed_out
    }

    /// Display `id` at `offset` outside of any transition (gesture preview).
    pub fn place(&mut self, stage: &mut dyn Stage, id: &SurfaceId, offset: Offset) {
        self.release(id);
        if !self.visibility(id).is_displayed() {
            stage.clear_animation(id);
            stage.show(id);
            self.set_visibility(id, Visibility::Entering);
        }
        stage.set_offset(id, offset);
    }

    /// Hide a previewed surface and reset its offset.
    pub fn retract(&mut self, stage: &mut dyn Stage, id: &SurfaceId) {
        self.release(id);
        stage.hide(id);
        stage.set_offset(id, Offset::ZERO);
        self.set_visibility(id, Visibility::Hidden);
    }

    /// Animate each `(surface, from, to)` track to rest, hiding `hide_at_end`
    /// once the slide completes.
    pub fn settle(
        &mut self,
        tracks: Vec<(SurfaceId, Offset, Offset)>,
        hide_at_end: Option<SurfaceId>,
    ) -> TransitionId {
        let id = self.allocate();
        for (surface, _, _) in &tracks {
            self.claim(surface, id);
        }
        if let Some(hidden) = &hide_at_end {
            if self.visibility(hidden).is_displayed() {
                self.set_visibility(hidden, Visibility::Leaving);
            }
        }

        tracing::debug!(transition = %id, tracks = tracks.len(), "Settling surfaces");

        self.transitions.push(Transition {
            id,
            kind: TransitionKind::Swipe,
            outgoing: hide_at_end.clone(),
            incoming: None,
            phase: Phase::Sliding { step: 0 },
            tracks: tracks
                .into_iter()
                .map(|(id, from, to)| Track { id, from, to })
                .collect(),
            hide_at_end,
        });
        id
    }

    /// Slide `id` from its dragged offset out of view and hide it.
    pub fn slide_out(&mut self, id: &SurfaceId, from: Offset, to: Offset) -> TransitionId {
        self.settle(vec![(id.clone(), from, to)], Some(id.clone()))
    }

    pub fn visibility(&self, id: &SurfaceId) -> Visibility {
        self.visibility.get(id).copied().unwrap_or_default()
    }

    pub fn is_idle(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.transitions.len()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn allocate(&mut self) -> TransitionId {
        self.next_id += 1;
        TransitionId(self.next_id)
    }

    fn position(&self, id: TransitionId) -> Option<usize> {
        self.transitions.iter().position(|t| t.id == id)
    }

    fn owns(&self, element: &SurfaceId, id: TransitionId) -> bool {
        self.owners.get(element) == Some(&id)
    }

    fn claim(&mut self, element: &SurfaceId, id: TransitionId) {
        if let Some(previous) = self.owners.insert(element.clone(), id) {
            if previous != id && self.position(previous).is_some() {
                tracing::warn!(
                    surface = %element,
                    superseded = %previous,
                    transition = %id,
                    "Re-entrant switch while a transition is in flight"
                );
            }
        }
    }

    fn release(&mut self, element: &SurfaceId) {
        if let Some(previous) = self.owners.remove(element) {
            tracing::trace!(surface = %element, transition = %previous, "Released element");
        }
    }

    fn set_visibility(&mut self, id: &SurfaceId, next: Visibility) {
        let current = self.visibility(id);
        if !current.can_transition_to(next) {
            tracing::warn!(
                surface = %id,
                from = %current,
                to = %next,
                "Unexpected visibility transition"
            );
        }
        if next == Visibility::Hidden {
            self.visibility.remove(id);
        } else {
            self.visibility.insert(id.clone(), next);
        }
    }

    /// Show the incoming surface and start its in-animation. Returns false
    /// when there is nothing left to wait for.
    fn begin_enter(&mut self, stage: &mut dyn Stage, transition: &mut Transition) -> bool {
        let Some(incoming) = transition.incoming.clone() else {
            return false;
        };
        if !self.owns(&incoming, transition.id) {
            tracing::debug!(
                surface = %incoming,
                transition = %transition.id,
                "Incoming surface claimed by a newer transition"
            );
            return false;
        }

        stage.set_offset(&incoming, Offset::ZERO);
        stage.show(&incoming);
        stage.start_animation(&incoming, Animation::enter(transition.kind));
        self.set_visibility(&incoming, Visibility::Entering);
        transition.phase = Phase::AnimatingIn {
            deadline_ms: self.now_ms + self.timeout_ms,
        };
        true
    }

    fn advance(&mut self, stage: &mut dyn Stage, pos: usize, timed_out: bool) {
        let mut transition = self.transitions.swap_remove(pos);

        if timed_out {
            tracing::debug!(
                transition = %transition.id,
                phase = transition.phase.as_str(),
                timeout_ms = self.timeout_ms,
                "Fallback timer fired"
            );
        }

        let in_flight = match transition.phase {
            Phase::AnimatingOut { .. } => {
                if let Some(out) = transition.outgoing.clone() {
                    if self.owns(&out, transition.id) {
                        stage.clear_animation(&out);
                        stage.hide(&out);
                        self.set_visibility(&out, Visibility::Hidden);
                    }
                }
                self.begin_enter(stage, &mut transition)
            }
            Phase::AnimatingIn { .. } => {
                if let Some(inc) = transition.incoming.clone() {
                    if self.owns(&inc, transition.id) {
                        stage.clear_animation(&inc);
                        if self.visibility(&inc) == Visibility::Entering {
                            self.set_visibility(&inc, Visibility::Shown);
                        }
                    }
                }
                false
            }
            Phase::Sliding { .. } => true,
        };

        if in_flight {
            self.transitions.push(transition);
        } else {
            self.finish(&transition);
        }
    }

    fn step_slide(&mut self, stage: &mut dyn Stage, pos: usize) {
        let mut transition = self.transitions.swap_remove(pos);
        let Phase::Sliding { step } = transition.phase else {
            self.transitions.push(transition);
            return;
        };

        let step = step + 1;
        let t = ease_out_cubic(f64::from(step) / f64::from(self.steps));
        for track in &transition.tracks {
            if self.owns(&track.id, transition.id) {
                stage.set_offset(&track.id, Offset::lerp(track.from, track.to, t));
            }
        }

        if step < self.steps {
            transition.phase = Phase::Sliding { step };
            self.transitions.push(transition);
            return;
        }

        for track in &transition.tracks {
            if !self.owns(&track.id, transition.id) {
                continue;
            }
            if transition.hide_at_end.as_ref() == Some(&track.id) {
                stage.hide(&track.id);
                stage.set_offset(&track.id, Offset::ZERO);
                self.set_visibility(&track.id, Visibility::Hidden);
            } else if self.visibility(&track.id).is_displayed() {
                self.set_visibility(&track.id, Visibility::Shown);
            }
        }
        self.finish(&transition);
    }

    fn finish(&mut self, transition: &Transition) {
        self.owners.retain(|_, owner| *owner != transition.id);
        tracing::debug!(
            transition = %transition.id,
            kind = %transition.kind,
            "Transition done"
        );
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(DEFAULT_ANIMATION_TIMEOUT_MS, DEFAULT_SWIPE_STEPS)
    }
}
