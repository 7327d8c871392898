//! Surface data structure and lifecycle hooks

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::sync::Arc;

use crate::error::SurfaceError;
use crate::kind::TransitionKind;
use crate::Result;

/// Stable registry key, also the identifier part of the routing string
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An identifier must be non-empty and must not contain the
    /// fragment delimiters `#` or `?`.
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() || self.0.contains(['#', '?']) {
            return Err(SurfaceError::InvalidIdentifier(self.0.clone()));
        }
        Ok(())
    }
}

impl std::fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SurfaceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SurfaceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for SurfaceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SurfaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    /// Mutually exclusive full-screen panel
    Page,
    /// Overlay stacked above the current page
    Modal,
}

/// Neighbour direction through the registry's page ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Previous => Direction::Next,
            Direction::Next => Direction::Previous,
        }
    }
}

/// Lifecycle capability a surface may implement.
///
/// Every method defaults to a no-op, so a surface only overrides what it
/// cares about. Panics inside a hook are not caught.
pub trait SurfaceHooks {
    /// The surface became the current page or modal
    fn on_show(&self, _search: &str, _referrer: Option<&SurfaceId>) {}

    /// The surface is being replaced by `next_id`
    fn on_hide(&self, _next_search: &str, _next_id: Option<&SurfaceId>) {}

    /// A page was re-targeted with a different search payload
    fn on_search_change(&self, _search: &str) {}

    /// The open modal was re-targeted with a different search payload
    fn on_update_search(&self, _search: &str) {}
}

#[derive(Clone)]
pub struct Surface {
    /// Unique identifier
    pub id: SurfaceId,
    /// Page or modal
    pub kind: SurfaceKind,
    /// Position in the registry ordering (pages and modals are numbered separately)
    pub order: usize,
    /// Preferred transition, beats the global default
    pub transition: Option<TransitionKind>,
    hooks: Option<Arc<dyn SurfaceHooks>>,
}

impl Surface {
    pub fn page(id: impl Into<SurfaceId>) -> Self {
        Self::new(id.into(), SurfaceKind::Page)
    }

    pub fn modal(id: impl Into<SurfaceId>) -> Self {
        Self::new(id.into(), SurfaceKind::Modal)
    }

    fn new(id: SurfaceId, kind: SurfaceKind) -> Self {
        Self {
            id,
            kind,
            order: 0,
            transition: None,
            hooks: None,
        }
    }

    pub fn with_transition(mut self, kind: TransitionKind) -> Self {
        self.transition = Some(kind);
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn SurfaceHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn is_page(&self) -> bool {
        self.kind == SurfaceKind::Page
    }

    pub fn is_modal(&self) -> bool {
        self.kind == SurfaceKind::Modal
    }

    pub fn has_hooks(&self) -> bool {
        self.hooks.is_some()
    }

    pub fn notify_show(&self, search: &str, referrer: Option<&SurfaceId>) {
        if let Some(hooks) = &self.hooks {
            hooks.on_show(search, referrer);
        }
    }

    pub fn notify_hide(&self, next_search: &str, next_id: Option<&SurfaceId>) {
        if let Some(hooks) = &self.hooks {
            hooks.on_hide(next_search, next_id);
        }
    }

    pub fn notify_search_change(&self, search: &str) {
        if let Some(hooks) = &self.hooks {
            hooks.on_search_change(search);
        }
    }

    pub fn notify_update_search(&self, search: &str) {
        if let Some(hooks) = &self.hooks {
            hooks.on_update_search(search);
        }
    }
}

impl PartialEq for Surface {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.kind == other.kind
    }
}

impl Eq for Surface {}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("order", &self.order)
            .field("transition", &self.transition)
            .field("hooks", &self.hooks.is_some())
            .finish()
    }
}
