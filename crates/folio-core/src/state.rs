//! Controller state

use folio_surface::{Offset, Surface, SurfaceId, TransitionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPhase {
    NoSurface,
    PageShown,
    PageShownWithModal,
}

impl NavigationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationPhase::NoSurface => "no_surface",
            NavigationPhase::PageShown => "page_shown",
            NavigationPhase::PageShownWithModal => "page_shown_with_modal",
        }
    }
}

impl std::fmt::Display for NavigationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What is on screen.
///
/// At most one page and one modal are current; the modal sits above the
/// page, which stays mounted but inert.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    pub current_page: Option<Surface>,
    pub current_modal: Option<Surface>,
    /// Search payload the current page was shown with
    pub current_search: String,
}

impl NavigationState {
    pub fn phase(&self) -> NavigationPhase {
        match (&self.current_page, &self.current_modal) {
            (Some(_), Some(_)) => NavigationPhase::PageShownWithModal,
            (Some(_), None) => NavigationPhase::PageShown,
            (None, _) => NavigationPhase::NoSurface,
        }
    }

    pub fn current_page_id(&self) -> Option<&SurfaceId> {
        self.current_page.as_ref().map(|p| &p.id)
    }

    pub fn current_modal_id(&self) -> Option<&SurfaceId> {
        self.current_modal.as_ref().map(|m| &m.id)
    }
}

/// A location notification the controller has arranged to skip, consumed
/// by the very next notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingSuppression {
    /// Backing out of the modal entries before re-pushing `fragment`
    ModalRedirect { fragment: String },
}

impl PendingSuppression {
    pub fn reason(&self) -> &'static str {
        match self {
            PendingSuppression::ModalRedirect { .. } => "modal_redirect",
        }
    }
}

/// Bookkeeping for the open modal
#[derive(Debug, Clone, PartialEq)]
pub struct ModalSession {
    /// Host depth of the entry that opened the modal
    pub opened_at_depth: usize,
    /// Resolved transition, reused to close
    pub kind: TransitionKind,
    pub search: String,
    /// Offset the modal was dragged to before a swipe dismissal
    pub dismissed_from: Option<Offset>,
}

impl ModalSession {
    pub fn new(opened_at_depth: usize, kind: TransitionKind, search: impl Into<String>) -> Self {
        Self {
            opened_at_depth,
            kind,
            search: search.into(),
            dismissed_from: None,
        }
    }
}
