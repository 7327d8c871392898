//! Transition kinds and animation names

use serde::{Deserialize, Serialize};

/// How one surface replaces another.
///
/// `SlideByOrder` and `FlipByOrder` are order-dependent: they resolve to a
/// direction-bearing variant by comparing the two surfaces' positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    None,
    Fade,
    Slide,
    SlideReverse,
    SlideByOrder,
    Pop,
    Flip,
    FlipReverse,
    FlipByOrder,
    DrawerTop,
    DrawerBottom,
    DrawerLeft,
    DrawerRight,
    /// Gesture-driven slide, incoming enters from the right
    Swipe,
    /// Gesture-driven slide, incoming enters from the left
    SwipeReverse,
}

impl TransitionKind {
    pub const ALL: [TransitionKind; 15] = [
        TransitionKind::None,
        TransitionKind::Fade,
        TransitionKind::Slide,
        TransitionKind::SlideReverse,
        TransitionKind::SlideByOrder,
        TransitionKind::Pop,
        TransitionKind::Flip,
        TransitionKind::FlipReverse,
        TransitionKind::FlipByOrder,
        TransitionKind::DrawerTop,
        TransitionKind::DrawerBottom,
        TransitionKind::DrawerLeft,
        TransitionKind::DrawerRight,
        TransitionKind::Swipe,
        TransitionKind::SwipeReverse,
    ];

    /// Pick the kind for the next switch: one-shot override, then the
    /// incoming surface's preference, then the global default.
    pub fn requested(
        override_kind: Option<TransitionKind>,
        preference: Option<TransitionKind>,
        default: TransitionKind,
    ) -> TransitionKind {
        override_kind.or(preference).unwrap_or(default)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::None => "none",
            TransitionKind::Fade => "fade",
            TransitionKind::Slide => "slide",
            TransitionKind::SlideReverse => "slide-reverse",
            TransitionKind::SlideByOrder => "slide-by-order",
            TransitionKind::Pop => "pop",
            TransitionKind::Flip => "flip",
            TransitionKind::FlipReverse => "flip-reverse",
            TransitionKind::FlipByOrder => "flip-by-order",
            TransitionKind::DrawerTop => "drawer-top",
            TransitionKind::DrawerBottom => "drawer-bottom",
            TransitionKind::DrawerLeft => "drawer-left",
            TransitionKind::DrawerRight => "drawer-right",
            TransitionKind::Swipe => "swipe",
            TransitionKind::SwipeReverse => "swipe-reverse",
        }
    }

    /// Base name of the `-in`/`-out` animation classes.
    /// Unresolved order-dependent kinds fall back to their forward variant.
    pub fn animation_name(&self) -> &'static str {
        match self {
            TransitionKind::SlideByOrder => "slide",
            TransitionKind::FlipByOrder => "flip",
            other => other.as_str(),
        }
    }

    pub fn is_order_dependent(&self) -> bool {
        matches!(
            self,
            TransitionKind::SlideByOrder | TransitionKind::FlipByOrder
        )
    }

    /// Interpolated by offset rather than by declarative animation
    pub fn is_swipe(&self) -> bool {
        matches!(self, TransitionKind::Swipe | TransitionKind::SwipeReverse)
    }

    pub fn is_animated(&self) -> bool {
        *self != TransitionKind::None
    }

    /// Which way a modal using this transition may be dragged to dismiss it.
    /// Drawers are named after the way they travel while opening, so a
    /// left drawer closes to the right. `None` when the transition implies
    /// no direction.
    pub fn dismiss_direction(&self) -> Option<DismissDirection> {
        let (axis, sign) = match self {
            TransitionKind::Slide | TransitionKind::Swipe => (Axis::Horizontal, 1.0),
            TransitionKind::SlideReverse | TransitionKind::SwipeReverse => {
                (Axis::Horizontal, -1.0)
            }
            TransitionKind::DrawerLeft => (Axis::Horizontal, 1.0),
            TransitionKind::DrawerRight => (Axis::Horizontal, -1.0),
            TransitionKind::DrawerTop => (Axis::Vertical, 1.0),
            TransitionKind::DrawerBottom => (Axis::Vertical, -1.0),
            _ => return None,
        };
        Some(DismissDirection { axis, sign })
    }
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransitionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TransitionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("Unknown transition: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Axis plus sign (`1.0` or `-1.0`) of an allowed dismiss drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DismissDirection {
    pub axis: Axis,
    pub sign: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationPhase {
    In,
    Out,
}

impl AnimationPhase {
    pub fn suffix(&self) -> &'static str {
        match self {
            AnimationPhase::In => "in",
            AnimationPhase::Out => "out",
        }
    }
}

/// A named declarative animation started on one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Animation {
    pub kind: TransitionKind,
    pub phase: AnimationPhase,
}

impl Animation {
    pub fn enter(kind: TransitionKind) -> Self {
        Self {
            kind,
            phase: AnimationPhase::In,
        }
    }

    pub fn exit(kind: TransitionKind) -> Self {
        Self {
            kind,
            phase: AnimationPhase::Out,
        }
    }

    /// e.g. `slide-reverse-in`
    pub fn class_name(&self) -> String {
        format!("{}-{}", self.kind.animation_name(), self.phase.suffix())
    }
}
