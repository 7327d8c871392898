//! Surface visibility state machine
//!
//! ```text
//! Hidden
//!   ↓ show (animated)
//! Entering
//!   ↓ animation end / fallback timer
//! Shown
//!   ↓ hide (animated)
//! Leaving
//!   ↓ animation end / fallback timer
//! Hidden
//! ```
//!
//! Unanimated switches jump straight between `Hidden` and `Shown`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Not displayed
    #[default]
    Hidden,
    /// Displayed while its in-animation runs
    Entering,
    /// Displayed and at rest
    Shown,
    /// Still displayed while its out-animation runs
    Leaving,
}

impl Visibility {
    /// Check if transition to another state is expected.
    ///
    /// A re-entrant navigation can legitimately produce an unexpected
    /// transition (e.g. `Leaving → Entering`); callers log those instead of
    /// rejecting them.
    pub fn can_transition_to(&self, target: Visibility) -> bool {
        match (self, target) {
            (Visibility::Hidden, Visibility::Entering) => true,
            (Visibility::Hidden, Visibility::Shown) => true,
            (Visibility::Entering, Visibility::Shown) => true,
            (Visibility::Entering, Visibility::Hidden) => true,
            (Visibility::Entering, Visibility::Leaving) => true,
            (Visibility::Shown, Visibility::Leaving) => true,
            (Visibility::Shown, Visibility::Hidden) => true,
            (Visibility::Leaving, Visibility::Hidden) => true,
            (a, b) if *a == b => true,
            _ => false,
        }
    }

    /// Returns true if the surface occupies the screen
    pub fn is_displayed(&self) -> bool {
        !matches!(self, Visibility::Hidden)
    }

    pub fn is_animating(&self) -> bool {
        matches!(self, Visibility::Entering | Visibility::Leaving)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Hidden => "hidden",
            Visibility::Entering => "entering",
            Visibility::Shown => "shown",
            Visibility::Leaving => "leaving",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
