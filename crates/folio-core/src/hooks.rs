//! Application-level navigation hooks

use folio_history::NavigationOrigin;
use folio_location::RoutingString;
use folio_surface::Surface;

/// A location notification as the controller saw it
#[derive(Debug, Clone, PartialEq)]
pub struct LocationChange {
    pub href: String,
    pub routing: RoutingString,
    pub depth: usize,
    pub origin: NavigationOrigin,
}

/// Global callbacks, all optional.
///
/// Per-surface callbacks live on [`folio_surface::SurfaceHooks`].
pub trait NavigationHooks {
    /// The current page changed
    fn on_switch_page(&self, _outgoing: Option<&Surface>, _incoming: &Surface) {}

    /// A modal opened (`opening`) or closed over `page`
    fn on_switch_modal(&self, _opening: bool, _modal: &Surface, _page: Option<&Surface>) {}

    /// Every distinct location notification, before it is processed
    fn on_update_hash(&self, _change: &LocationChange) {}
}
