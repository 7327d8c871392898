//! Rendering seam
//!
//! The engine never touches UI elements directly. Everything visible goes
//! through a [`Stage`]; a browser host maps these calls onto DOM classes and
//! inline styles, tests and headless hosts use [`HeadlessStage`].

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::kind::{Animation, Axis};
use crate::surface::SurfaceId;

/// Translation applied to a surface, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn horizontal(x: f64) -> Self {
        Self { x, y: 0.0 }
    }

    pub fn along(axis: Axis, value: f64) -> Self {
        match axis {
            Axis::Horizontal => Self::new(value, 0.0),
            Axis::Vertical => Self::new(0.0, value),
        }
    }

    pub fn component(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Linear interpolation
    pub fn lerp(from: Offset, to: Offset, t: f64) -> Offset {
        Offset {
            x: from.x + (to.x - from.x) * t,
            y: from.y + (to.y - from.y) * t,
        }
    }
}

impl std::ops::Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Offset {
    type Output = Offset;

    fn sub(self, rhs: Offset) -> Offset {
        Offset::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Host rendering primitives
pub trait Stage {
    /// Make the surface visible
    fn show(&mut self, id: &SurfaceId);

    /// Remove the surface from view
    fn hide(&mut self, id: &SurfaceId);

    /// Start a named `-in`/`-out` animation; replaces any running one
    fn start_animation(&mut self, id: &SurfaceId, animation: Animation);

    fn clear_animation(&mut self, id: &SurfaceId);

    fn set_offset(&mut self, id: &SurfaceId, offset: Offset);

    /// Inert surfaces stay mounted but ignore input (a page under a modal)
    fn set_inert(&mut self, id: &SurfaceId, inert: bool);

    fn set_backdrop(&mut self, visible: bool, animation: Option<Animation>);

    fn viewport(&self) -> Viewport;
}

/// One recorded stage call
#[derive(Debug, Clone, PartialEq)]
pub enum StageOp {
    Show(SurfaceId),
    Hide(SurfaceId),
    Animate(SurfaceId, String),
    ClearAnimation(SurfaceId),
    Offset(SurfaceId, Offset),
    Inert(SurfaceId, bool),
    Backdrop(bool),
}

#[derive(Default)]
struct HeadlessInner {
    visible: HashSet<SurfaceId>,
    animations: HashMap<SurfaceId, Animation>,
    offsets: HashMap<SurfaceId, Offset>,
    inert: HashSet<SurfaceId>,
    backdrop: bool,
    viewport: Viewport,
    ops: Vec<StageOp>,
}

/// Stage without a UI: tracks what would be on screen
pub struct HeadlessStage {
    inner: Arc<Mutex<HeadlessInner>>,
}

impl HeadlessStage {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HeadlessInner {
                viewport,
                ..Default::default()
            })),
        }
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.inner.lock().visible.contains(id)
    }

    /// Identifiers currently visible, sorted
    pub fn visible(&self) -> Vec<SurfaceId> {
        let mut ids: Vec<SurfaceId> = self.inner.lock().visible.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn animation(&self, id: &str) -> Option<Animation> {
        self.inner.lock().animations.get(id).copied()
    }

    pub fn offset(&self, id: &str) -> Offset {
        self.inner
            .lock()
            .offsets
            .get(id)
            .copied()
            .unwrap_or_default()
    }

    pub fn is_inert(&self, id: &str) -> bool {
        self.inner.lock().inert.contains(id)
    }

    pub fn backdrop_visible(&self) -> bool {
        self.inner.lock().backdrop
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.inner.lock().viewport = viewport;
    }

    pub fn ops(&self) -> Vec<StageOp> {
        self.inner.lock().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.inner.lock().ops.clear();
    }
}

impl Stage for HeadlessStage {
    fn show(&mut self, id: &SurfaceId) {
        let mut inner = self.inner.lock();
        inner.visible.insert(id.clone());
        inner.ops.push(StageOp::Show(id.clone()));
    }

    fn hide(&mut self, id: &SurfaceId) {
        let mut inner = self.inner.lock();
        inner.visible.remove(id);
        inner.ops.push(StageOp::Hide(id.clone()));
    }

    fn start_animation(&mut self, id: &SurfaceId, animation: Animation) {
        let mut inner = self.inner.lock();
        inner.animations.insert(id.clone(), animation);
        inner
            .ops
            .push(StageOp::Animate(id.clone(), animation.class_name()));
    }

    fn clear_animation(&mut self, id: &SurfaceId) {
        let mut inner = self.inner.lock();
        inner.animations.remove(id);
        inner.ops.push(StageOp::ClearAnimation(id.clone()));
    }

    fn set_offset(&mut self, id: &SurfaceId, offset: Offset) {
        let mut inner = self.inner.lock();
        if offset == Offset::ZERO {
            inner.offsets.remove(id);
        } else {
            inner.offsets.insert(id.clone(), offset);
        }
        inner.ops.push(StageOp::Offset(id.clone(), offset));
    }

    fn set_inert(&mut self, id: &SurfaceId, inert: bool) {
        let mut inner = self.inner.lock();
        if inert {
            inner.inert.insert(id.clone());
        } else {
            inner.inert.remove(id);
        }
        inner.ops.push(StageOp::Inert(id.clone(), inert));
    }

    fn set_backdrop(&mut self, visible: bool, _animation: Option<Animation>) {
        let mut inner = self.inner.lock();
        inner.backdrop = visible;
        inner.ops.push(StageOp::Backdrop(visible));
    }

    fn viewport(&self) -> Viewport {
        self.inner.lock().viewport
    }
}

impl Default for HeadlessStage {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl Clone for HeadlessStage {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
