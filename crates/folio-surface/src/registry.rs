//! Surface registry
//!
//! The host owns creation and deletion of surfaces; the engine only reads
//! through the [`Registry`] trait.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SurfaceError;
use crate::surface::{Direction, Surface, SurfaceId, SurfaceKind};
use crate::Result;

/// Read-only view of the surfaces the engine may navigate to
pub trait Registry {
    /// Look up a surface by identifier
    fn resolve(&self, id: &str) -> Option<Surface>;

    /// Position of the surface in its ordering
    fn order_index(&self, surface: &Surface) -> usize;

    /// Previous/next page by order; modals have no neighbours
    fn neighbor(&self, surface: &Surface, direction: Direction) -> Option<Surface>;

    /// Identifier to redirect to on first load
    fn default_identifier(&self) -> Option<SurfaceId>;
}

#[derive(Default)]
struct Inner {
    surfaces: HashMap<SurfaceId, Surface>,
    page_order: Vec<SurfaceId>,
    modal_order: Vec<SurfaceId>,
}

impl Inner {
    fn order_mut(&mut self, kind: SurfaceKind) -> &mut Vec<SurfaceId> {
        match kind {
            SurfaceKind::Page => &mut self.page_order,
            SurfaceKind::Modal => &mut self.modal_order,
        }
    }

    /// Rewrite `order` of every surface of `kind` from its list position
    fn renumber(&mut self, kind: SurfaceKind) {
        let ids = self.order_mut(kind).clone();
        for (index, id) in ids.iter().enumerate() {
            if let Some(surface) = self.surfaces.get_mut(id) {
                surface.order = index;
            }
        }
    }
}

/// In-memory registry shared between the host and the engine
pub struct SurfaceRegistry {
    inner: Arc<RwLock<Inner>>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Register a surface at the end of its ordering
    pub fn register(&self, mut surface: Surface) -> Result<Surface> {
        surface.id.validate()?;

        let mut inner = self.inner.write();
        if inner.surfaces.contains_key(&surface.id) {
            return Err(SurfaceError::Duplicate(surface.id.to_string()));
        }

        let order = inner.order_mut(surface.kind);
        surface.order = order.len();
        order.push(surface.id.clone());
        inner.surfaces.insert(surface.id.clone(), surface.clone());

        tracing::debug!(
            surface_id = %surface.id,
            kind = ?surface.kind,
            order = surface.order,
            "Registered surface"
        );

        Ok(surface)
    }

    pub fn register_page(&self, id: impl Into<SurfaceId>) -> Result<Surface> {
        self.register(Surface::page(id))
    }

    pub fn register_modal(&self, id: impl Into<SurfaceId>) -> Result<Surface> {
        self.register(Surface::modal(id))
    }

    /// Remove a surface (the host deleted its element)
    pub fn remove(&self, id: &str) -> Result<Surface> {
        let mut inner = self.inner.write();
        let surface = inner
            .surfaces
            .remove(id)
            .ok_or_else(|| SurfaceError::NotFound(id.to_string()))?;

        inner.order_mut(surface.kind).retain(|other| other.as_str() != id);
        inner.renumber(surface.kind);

        tracing::debug!(surface_id = %id, "Removed surface");

        Ok(surface)
    }

    /// Move a page to a new position in the ordering
    pub fn move_page(&self, id: &str, new_index: usize) -> Result<()> {
        let mut inner = self.inner.write();
        let current_index = inner
            .page_order
            .iter()
            .position(|other| other.as_str() == id)
            .ok_or_else(|| SurfaceError::NotFound(id.to_string()))?;

        let id = inner.page_order.remove(current_index);
        let insert_index = new_index.min(inner.page_order.len());
        inner.page_order.insert(insert_index, id);
        inner.renumber(SurfaceKind::Page);

        Ok(())
    }

    /// Pages in order
    pub fn pages(&self) -> Vec<Surface> {
        let inner = self.inner.read();
        inner
            .page_order
            .iter()
            .filter_map(|id| inner.surfaces.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().surfaces.is_empty()
    }
}

impl Registry for SurfaceRegistry {
    fn resolve(&self, id: &str) -> Option<Surface> {
        self.inner.read().surfaces.get(id).cloned()
    }

    fn order_index(&self, surface: &Surface) -> usize {
        self.inner
            .read()
            .surfaces
            .get(&surface.id)
            .map(|s| s.order)
            .unwrap_or(surface.order)
    }

    fn neighbor(&self, surface: &Surface, direction: Direction) -> Option<Surface> {
        if !surface.is_page() {
            return None;
        }

        let inner = self.inner.read();
        let index = inner.page_order.iter().position(|id| *id == surface.id)?;
        let neighbor_index = match direction {
            Direction::Previous => index.checked_sub(1)?,
            Direction::Next => index + 1,
        };

        inner
            .page_order
            .get(neighbor_index)
            .and_then(|id| inner.surfaces.get(id))
            .cloned()
    }

    fn default_identifier(&self) -> Option<SurfaceId> {
        self.inner.read().page_order.first().cloned()
    }
}

impl Default for SurfaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SurfaceRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::TransitionKind;

    fn registry() -> SurfaceRegistry {
        let registry = SurfaceRegistry::new();
        registry.register_page("a").unwrap();
        registry.register_page("b").unwrap();
        registry.register_page("c").unwrap();
        registry
            .register(Surface::modal("menu").with_transition(TransitionKind::DrawerLeft))
            .unwrap();
        registry
    }

    #[test]
    fn test_register_assigns_order() {
        let registry = registry();
        assert_eq!(registry.len(), 4);

        let c = registry.resolve("c").unwrap();
        assert_eq!(registry.order_index(&c), 2);

        // Modals are numbered separately
        let menu = registry.resolve("menu").unwrap();
        assert_eq!(menu.order, 0);
        assert_eq!(menu.transition, Some(TransitionKind::DrawerLeft));
    }

    #[test]
    fn test_duplicate_and_invalid() {
        let registry = registry();
        assert!(matches!(
            registry.register_page("a"),
            Err(SurfaceError::Duplicate(_))
        ));
        assert!(matches!(
            registry.register_page("bad?id"),
            Err(SurfaceError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_neighbors() {
        let registry = registry();
        let a = registry.resolve("a").unwrap();
        let b = registry.resolve("b").unwrap();
        let c = registry.resolve("c").unwrap();
        let menu = registry.resolve("menu").unwrap();

        assert!(registry.neighbor(&a, Direction::Previous).is_none());
        assert_eq!(registry.neighbor(&a, Direction::Next), Some(b.clone()));
        assert_eq!(registry.neighbor(&b, Direction::Previous), Some(a));
        assert!(registry.neighbor(&c, Direction::Next).is_none());
        assert!(registry.neighbor(&menu, Direction::Next).is_none());
    }

    #[test]
    fn test_default_identifier_is_first_page() {
        let registry = registry();
        assert_eq!(registry.default_identifier(), Some(SurfaceId::new("a")));
        assert!(SurfaceRegistry::new().default_identifier().is_none());
    }

    #[test]
    fn test_move_and_remove() {
        let registry = registry();

        // Move c to the front
        registry.move_page("c", 0).unwrap();
        let ids: Vec<String> = registry.pages().iter().map(|s| s.id.to_string()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(registry.resolve("b").unwrap().order, 2);

        // Remove a
        registry.remove("a").unwrap();
        assert!(registry.resolve("a").is_none());
        assert_eq!(registry.resolve("b").unwrap().order, 1);
        assert!(registry.remove("a").is_err());
    }

    #[test]
    fn test_clone_shares_state() {
        let registry = SurfaceRegistry::new();
        let host_side = registry.clone();
        host_side.register_page("late").unwrap();
        assert!(registry.resolve("late").is_some());
    }
}
