//! Navigation Controller
//!
//! Every location notification is decoded and classified against the
//! current state:
//!
//! ```text
//! NoSurface ──page──▶ PageShown ──modal──▶ PageShownWithModal
//!     │                  ▲  │                    │
//!     └─default redirect─┘  └──page switch       └──page: close modal
//! ```
//!
//! Notifications are not queued. One that arrives mid-animation is handled
//! against the state as it stands, and the orchestrator sorts out which
//! transition owns which surface.

use uuid::Uuid;

use folio_gesture::{PointerSource, SwipeOutcome, SwipeRecognizer};
use folio_history::{HistoryHost, HistoryReconciler, NavigationOrigin, Reconciliation};
use folio_location::{encode, Href, RoutingString};
use folio_storage::Database;
use folio_surface::{Animation, Offset, Registry, Stage, Surface, SurfaceId, TransitionKind};
use folio_transition::{resolve, Orchestrator};

use crate::config::Config;
use crate::error::NavigationError;
use crate::hooks::{LocationChange, NavigationHooks};
use crate::state::{ModalSession, NavigationPhase, NavigationState, PendingSuppression};
use crate::Result;

/// What a routing string names
enum Target {
    Page(Surface),
    Modal(Surface),
    Nothing,
}

/// Navigation controller.
///
/// Owns the whole navigation state; the host feeds it location
/// notifications, animation-end events, frame ticks and pointer events.
pub struct Navigator {
    config: Config,
    registry: Box<dyn Registry>,
    host: Box<dyn HistoryHost>,
    stage: Box<dyn Stage>,
    hooks: Option<Box<dyn NavigationHooks>>,
    reconciler: HistoryReconciler,
    orchestrator: Orchestrator,
    swipe: SwipeRecognizer,
    state: NavigationState,
    modal: Option<ModalSession>,
    /// One-shot transition for the next surface switch
    next_transition: Option<TransitionKind>,
    /// Offset a committed page swipe left the surfaces at
    swipe_residual: Option<Offset>,
    pending: Option<PendingSuppression>,
    last_seen: Option<(String, usize)>,
    issued_marker: Option<String>,
    booted: bool,
}

impl Navigator {
    pub fn new<R, H, S>(config: Config, registry: R, host: H, stage: S) -> Self
    where
        R: Registry + 'static,
        H: HistoryHost + 'static,
        S: Stage + 'static,
    {
        let reconciler = HistoryReconciler::new(config.history_managed, config.history_unique);
        Self::assemble(
            config,
            Box::new(registry),
            Box::new(host),
            Box::new(stage),
            reconciler,
        )
    }

    /// Create a navigator whose shadow history is persisted in `db`, scoped
    /// to the host document, and restored from it.
    pub fn with_store<R, H, S>(
        config: Config,
        registry: R,
        host: H,
        stage: S,
        db: Database,
    ) -> Result<Self>
    where
        R: Registry + 'static,
        H: HistoryHost + 'static,
        S: Stage + 'static,
    {
        let scope = Href::parse(&host.href())?.base();
        let reconciler = HistoryReconciler::with_store(
            config.history_managed,
            config.history_unique,
            db,
            &scope,
        )?;

        Ok(Self::assemble(
            config,
            Box::new(registry),
            Box::new(host),
            Box::new(stage),
            reconciler,
        ))
    }

    fn assemble(
        config: Config,
        registry: Box<dyn Registry>,
        host: Box<dyn HistoryHost>,
        stage: Box<dyn Stage>,
        reconciler: HistoryReconciler,
    ) -> Self {
        let orchestrator = Orchestrator::new(config.animation_timeout_ms, config.swipe_steps);
        let swipe = SwipeRecognizer::new(config.touch_debounce_ms);

        Self {
            config,
            registry,
            host,
            stage,
            hooks: None,
            reconciler,
            orchestrator,
            swipe,
            state: NavigationState::default(),
            modal: None,
            next_transition: None,
            swipe_residual: None,
            pending: None,
            last_seen: None,
            issued_marker: None,
            booted: false,
        }
    }

    pub fn with_hooks(mut self, hooks: impl NavigationHooks + 'static) -> Self {
        self.hooks = Some(Box::new(hooks));
        self
    }

    pub fn set_hooks(&mut self, hooks: impl NavigationHooks + 'static) {
        self.hooks = Some(Box::new(hooks));
    }

    // === State ===

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn phase(&self) -> NavigationPhase {
        self.state.phase()
    }

    pub fn current_page(&self) -> Option<&SurfaceId> {
        self.state.current_page_id()
    }

    pub fn current_modal(&self) -> Option<&SurfaceId> {
        self.state.current_modal_id()
    }

    pub fn modal_session(&self) -> Option<&ModalSession> {
        self.modal.as_ref()
    }

    /// The shadow history stack
    pub fn history(&self) -> &HistoryReconciler {
        &self.reconciler
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn gesture(&self) -> &SwipeRecognizer {
        &self.swipe
    }

    pub fn next_transition(&self) -> Option<TransitionKind> {
        self.next_transition
    }

    pub fn pending_suppression(&self) -> Option<&PendingSuppression> {
        self.pending.as_ref()
    }

    /// No transition in flight and no gesture being tracked
    pub fn is_idle(&self) -> bool {
        self.orchestrator.is_idle() && !self.swipe.is_tracking()
    }

    // === Lifecycle ===

    /// Handle the location the host shows at load
    pub fn start(&mut self) {
        tracing::info!(href = %self.host.href(), "Navigator started");
        self.handle_location_change();
    }

    /// Hide everything and forget all navigation state, including the
    /// shadow history.
    pub fn reset(&mut self) {
        let now = self.orchestrator.now_ms();
        self.swipe.abort(now, &mut *self.stage, &mut self.orchestrator);

        let modal = self.state.current_modal.take().map(|m| m.id);
        let page = self.state.current_page.take().map(|p| p.id);
        for id in modal.iter().chain(page.iter()) {
            self.orchestrator.swap(
                &mut *self.stage,
                Some(id),
                None,
                TransitionKind::None,
                Offset::ZERO,
            );
            self.stage.set_inert(id, false);
        }
        self.stage.set_backdrop(false, None);

        self.state = NavigationState::default();
        self.modal = None;
        self.next_transition = None;
        self.swipe_residual = None;
        self.pending = None;
        self.last_seen = None;
        self.issued_marker = None;
        self.booted = false;
        self.reconciler.reset();

        tracing::info!("Navigator reset");
    }

    // === Programmatic navigation ===

    /// Push a new location for `id`
    pub fn navigate(&mut self, id: &str, search: &str) {
        let fragment = encode(id, search);
        if self.current_fragment().as_deref() == Some(fragment.as_str()) {
            tracing::trace!(fragment = %fragment, "Already at location");
            return;
        }

        let marker = self.issue_marker();
        tracing::info!(fragment = %fragment, "Navigating");
        self.host.push(&fragment, Some(&marker));
    }

    /// Overwrite the current location with `id`
    pub fn replace(&mut self, id: &str, search: &str) {
        let fragment = encode(id, search);
        let marker = self.issue_marker();
        tracing::info!(fragment = %fragment, "Replacing location");
        self.host.replace(&fragment, Some(&marker));
    }

    pub fn back(&mut self) {
        self.host.go(-1);
    }

    /// Close the open modal by popping every entry pushed since it opened
    pub fn close_modal(&mut self) {
        let Some(session) = &self.modal else {
            tracing::trace!("No modal to close");
            return;
        };

        let depth = self.host.depth();
        if depth >= session.opened_at_depth && session.opened_at_depth > 1 {
            let delta = (depth - session.opened_at_depth + 1) as i32;
            tracing::info!(delta, "Closing modal");
            self.host.go(-delta);
            return;
        }

        // The modal entry is gone already; put the page back in the location
        tracing::debug!(
            depth,
            opened_at = session.opened_at_depth,
            "Modal entry missing from host history"
        );
        let page = self.state.current_page.clone();
        let search = self.state.current_search.clone();
        self.close_modal_visuals(page.as_ref().map(|p| &p.id), &search);
        if let Some(page) = page {
            let marker = self.issue_marker();
            self.host
                .replace(&encode(page.id.as_str(), &search), Some(&marker));
        }
    }

    /// Use `kind` for the next surface switch only
    pub fn set_next_transition(&mut self, kind: TransitionKind) {
        self.next_transition = Some(kind);
    }

    // === Host events ===

    /// The host's location changed (or may have).
    ///
    /// Reads the live location, so a burst of notifications for one change
    /// is handled once.
    pub fn handle_location_change(&mut self) {
        let raw = self.host.href();
        let depth = self.host.depth();

        if matches!(&self.last_seen, Some((href, seen)) if *href == raw && *seen == depth) {
            tracing::trace!(href = %raw, depth, "Ignoring duplicate location notification");
            return;
        }
        self.last_seen = Some((raw.clone(), depth));

        let href = match Href::parse(&raw) {
            Ok(href) => href,
            Err(e) => {
                tracing::error!("Ignoring unreadable location: {}", e);
                return;
            }
        };
        let routing = href.routing();
        let origin = self.origin();

        tracing::debug!(
            fragment = %href.fragment(),
            depth,
            ?origin,
            phase = %self.state.phase(),
            "Location changed"
        );

        if let Some(hooks) = &self.hooks {
            hooks.on_update_hash(&LocationChange {
                href: raw,
                routing: routing.clone(),
                depth,
                origin,
            });
        }

        if let Some(pending) = self.pending.take() {
            self.resume(pending);
            return;
        }

        if self.swipe.is_tracking() {
            let now = self.orchestrator.now_ms();
            self.swipe
                .abort(now, &mut *self.stage, &mut self.orchestrator);
        }

        let location = href.fragment().to_string();
        let RoutingString { identifier, search } = routing;

        match self.resolve_target(identifier.as_deref()) {
            Target::Page(page) => self.route_to_page(page, search, location, depth, origin),
            Target::Modal(modal) => self.route_to_modal(modal, search, location, depth),
            Target::Nothing => self.route_to_nothing(),
        }
    }

    /// Advance animations to `now_ms`; call once per frame while busy
    pub fn tick(&mut self, now_ms: f64) {
        for transition in self.orchestrator.tick(&mut *self.stage, now_ms) {
            let err = NavigationError::AnimationTimeout {
                transition,
                timeout_ms: self.config.animation_timeout_ms,
            };
            tracing::warn!("{}, completed by fallback timer", err);
        }
    }

    /// A surface's `-in`/`-out` animation ended
    pub fn animation_finished(&mut self, id: &str) -> bool {
        self.orchestrator
            .animation_finished(&mut *self.stage, &SurfaceId::from(id))
    }

    // === Gestures ===

    /// Returns true if a swipe gesture started
    pub fn pointer_down(&mut self, source: PointerSource, x: f64, y: f64, now_ms: f64) -> bool {
        if let Some(modal) = &self.state.current_modal {
            if !self.config.swipe.modal {
                return false;
            }
            let kind = self
                .modal
                .as_ref()
                .map(|s| s.kind)
                .unwrap_or(self.config.default_modal_transition);
            let Some(dismiss) = kind.dismiss_direction() else {
                tracing::trace!(kind = %kind, "Modal transition has no swipe direction");
                return false;
            };
            return self
                .swipe
                .begin_modal(source, x, y, now_ms, modal.clone(), dismiss);
        }

        if !self.config.swipe.page {
            return false;
        }
        match &self.state.current_page {
            Some(page) => self.swipe.begin_page(source, x, y, now_ms, page.clone()),
            None => false,
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.swipe.update(
            x,
            y,
            &*self.registry,
            &mut *self.stage,
            &mut self.orchestrator,
        );
    }

    /// Finish the gesture; a commit navigates like any other location change
    pub fn pointer_up(&mut self, now_ms: f64) -> SwipeOutcome {
        let outcome = self
            .swipe
            .release(now_ms, &*self.stage, &mut self.orchestrator);

        match &outcome {
            SwipeOutcome::CommitPage {
                candidate,
                transition,
                residual,
                ..
            } => {
                self.next_transition = Some(*transition);
                self.swipe_residual = Some(*residual);
                self.navigate(candidate.id.as_str(), "");
            }
            SwipeOutcome::DismissModal { residual, .. } => {
                if let Some(session) = self.modal.as_mut() {
                    session.dismissed_from = Some(*residual);
                }
                self.close_modal();
            }
            SwipeOutcome::Cancelled | SwipeOutcome::Ignored => {}
        }

        outcome
    }

    // === Routing ===

    fn resolve_target(&self, identifier: Option<&str>) -> Target {
        let Some(id) = identifier else {
            return Target::Nothing;
        };

        match self.registry.resolve(id) {
            Some(surface) if surface.is_page() => Target::Page(surface),
            Some(surface) => Target::Modal(surface),
            None => {
                let err = NavigationError::UnresolvedIdentifier(id.to_string());
                tracing::warn!("{}, treating as no surface", err);
                Target::Nothing
            }
        }
    }

    fn route_to_page(
        &mut self,
        page: Surface,
        search: String,
        location: String,
        depth: usize,
        origin: NavigationOrigin,
    ) {
        if !self.booted && self.config.default_page_firstly {
            if let Some(default) = self.default_page() {
                if default.id != page.id {
                    self.seat_default(&default);
                    let marker = self.issue_marker();
                    tracing::info!(deep_link = %location, "Seated default page beneath deep link");
                    self.host.push(&location, Some(&marker));
                    return;
                }
            }
        }
        self.booted = true;

        if self.state.current_modal.is_some() {
            let leaving_page = self
                .state
                .current_page
                .as_ref()
                .is_some_and(|current| current.id != page.id);

            if leaving_page && self.reconciler.is_managed() {
                if let Some(opened_at) = self.modal.as_ref().map(|s| s.opened_at_depth) {
                    if depth >= opened_at && opened_at > 1 {
                        // Leave the modal entries behind, then push the target
                        // from the page entry beneath them.
                        let delta = (depth - opened_at + 1) as i32;
                        tracing::info!(
                            target = %page.id,
                            delta,
                            "Backing out of modal before switching page"
                        );
                        self.close_modal_visuals(Some(&page.id), &search);
                        self.pending = Some(PendingSuppression::ModalRedirect {
                            fragment: location,
                        });
                        self.host.go(-delta);
                        return;
                    }
                }
            }

            self.close_modal_visuals(Some(&page.id), &search);
        }

        let same_page = self
            .state
            .current_page
            .as_ref()
            .is_some_and(|current| current.id == page.id);

        let reconciliation = self.reconciler.accept(&location, depth, origin);
        self.report_drift();

        if let Some(delta) = reconciliation.correction() {
            tracing::info!(delta, location = %location, "Correcting host history");
            self.host.go(delta);
        }

        if same_page {
            let changed = match reconciliation {
                Reconciliation::Settled => false,
                Reconciliation::Unmanaged => search != self.state.current_search,
                Reconciliation::Fresh | Reconciliation::Back { .. } => true,
            };
            if changed {
                tracing::debug!(page = %page.id, search = %search, "Search changed");
                self.state.current_search = search.clone();
                page.notify_search_change(&search);
            }
            return;
        }

        self.switch_page(page, search);
    }

    fn route_to_modal(&mut self, modal: Surface, search: String, location: String, depth: usize) {
        if self.state.current_page.is_none() {
            // Deep link straight to a modal: put the default page beneath it
            let Some(default) = self.default_page() else {
                let err = NavigationError::UnresolvedIdentifier(self.default_identifier_label());
                tracing::warn!("{}, cannot open modal without a page", err);
                return;
            };
            self.seat_default(&default);
            self.switch_page(default, String::new());
            let marker = self.issue_marker();
            tracing::info!(modal = %modal.id, "Seated default page beneath modal");
            self.host.push(&location, Some(&marker));
            return;
        }
        self.booted = true;

        let current = self.state.current_modal.clone();
        match current {
            None => self.open_modal(modal, search, depth),
            Some(current) if current.id == modal.id => {
                tracing::debug!(modal = %modal.id, search = %search, "Modal search updated");
                if let Some(session) = self.modal.as_mut() {
                    session.search = search.clone();
                }
                modal.notify_update_search(&search);
            }
            Some(current) => self.switch_modal(current, modal, search),
        }
    }

    fn route_to_nothing(&mut self) {
        if self.state.current_modal.is_some() {
            tracing::info!("No surface for location, closing modal");
            self.close_modal();
            return;
        }

        if let Some(page) = &self.state.current_page {
            if self.host.depth() > 1 {
                tracing::info!("No surface for location, going back");
                self.host.go(-1);
            } else {
                let fragment = encode(page.id.as_str(), &self.state.current_search);
                let marker = self.issue_marker();
                tracing::info!(fragment = %fragment, "No surface for location, restoring page");
                self.host.replace(&fragment, Some(&marker));
            }
            return;
        }

        match self.default_page() {
            Some(default) => {
                let marker = self.issue_marker();
                tracing::info!(default = %default.id, "Redirecting to default page");
                self.host.replace(default.id.as_str(), Some(&marker));
            }
            None => {
                let err = NavigationError::UnresolvedIdentifier(self.default_identifier_label());
                tracing::warn!("{}, nothing to show", err);
            }
        }
    }

    fn resume(&mut self, pending: PendingSuppression) {
        tracing::debug!(reason = pending.reason(), "Consumed suppressed notification");
        match pending {
            PendingSuppression::ModalRedirect { fragment } => {
                let marker = self.issue_marker();
                tracing::info!(fragment = %fragment, "Resuming page switch after modal");
                self.host.push(&fragment, Some(&marker));
            }
        }
    }

    /// Replace the current entry with the default page and record it
    fn seat_default(&mut self, default: &Surface) {
        let fragment = encode(default.id.as_str(), "");
        let marker = self.issue_marker();
        self.host.replace(&fragment, Some(&marker));

        let depth = self.host.depth();
        self.reconciler
            .accept(&fragment, depth, NavigationOrigin::Programmatic);
        self.report_drift();
        self.booted = true;
    }

    // === Surface switching ===

    fn switch_page(&mut self, incoming: Surface, search: String) {
        let outgoing = self.state.current_page.clone();

        if let Some(outgoing) = &outgoing {
            outgoing.notify_hide(&search, Some(&incoming.id));
        }

        let requested = TransitionKind::requested(
            self.next_transition.take(),
            incoming.transition,
            self.config.default_page_transition,
        );
        let kind = resolve(
            requested,
            outgoing.as_ref().map(|s| self.registry.order_index(s)),
            self.registry.order_index(&incoming),
        );
        let residual = self.swipe_residual.take().unwrap_or(Offset::ZERO);

        self.orchestrator.swap(
            &mut *self.stage,
            outgoing.as_ref().map(|s| &s.id),
            Some(&incoming.id),
            kind,
            residual,
        );

        incoming.notify_show(&search, outgoing.as_ref().map(|s| &s.id));

        tracing::info!(
            from = ?outgoing.as_ref().map(|s| s.id.as_str()),
            to = %incoming.id,
            transition = %kind,
            "Switched page"
        );

        self.state.current_page = Some(incoming.clone());
        self.state.current_search = search;

        if let Some(hooks) = &self.hooks {
            hooks.on_switch_page(outgoing.as_ref(), &incoming);
        }
    }

    fn open_modal(&mut self, modal: Surface, search: String, depth: usize) {
        let page = self.state.current_page.clone();
        let kind = self.modal_transition(&modal);

        if let Some(page) = &page {
            self.stage.set_inert(&page.id, true);
        }
        self.stage
            .set_backdrop(true, Some(Animation::enter(TransitionKind::Fade)));
        self.orchestrator
            .swap(&mut *self.stage, None, Some(&modal.id), kind, Offset::ZERO);

        modal.notify_show(&search, page.as_ref().map(|p| &p.id));

        tracing::info!(modal = %modal.id, depth, transition = %kind, "Opened modal");

        self.modal = Some(ModalSession::new(depth, kind, search));
        self.state.current_modal = Some(modal.clone());

        if let Some(hooks) = &self.hooks {
            hooks.on_switch_modal(true, &modal, page.as_ref());
        }
    }

    /// Replace the open modal's content, keeping the depth it opened at
    fn switch_modal(&mut self, outgoing: Surface, incoming: Surface, search: String) {
        let kind = self.modal_transition(&incoming);

        outgoing.notify_hide(&search, Some(&incoming.id));
        self.orchestrator.swap(
            &mut *self.stage,
            Some(&outgoing.id),
            Some(&incoming.id),
            kind,
            Offset::ZERO,
        );
        incoming.notify_show(&search, Some(&outgoing.id));

        tracing::info!(from = %outgoing.id, to = %incoming.id, "Switched modal");

        if let Some(session) = self.modal.as_mut() {
            session.kind = kind;
            session.search = search;
            session.dismissed_from = None;
        }
        self.state.current_modal = Some(incoming.clone());

        if let Some(hooks) = &self.hooks {
            hooks.on_switch_modal(true, &incoming, self.state.current_page.as_ref());
        }
    }

    fn close_modal_visuals(&mut self, next_id: Option<&SurfaceId>, next_search: &str) {
        let Some(modal) = self.state.current_modal.take() else {
            return;
        };
        let session = self.modal.take();
        let kind = session
            .as_ref()
            .map(|s| s.kind)
            .unwrap_or(self.config.default_modal_transition);

        modal.notify_hide(next_search, next_id);

        let dragged = session
            .and_then(|s| s.dismissed_from)
            .zip(kind.dismiss_direction());
        match dragged {
            Some((from, dismiss)) => {
                let extent = self.stage.viewport().extent(dismiss.axis);
                let to = Offset::along(dismiss.axis, dismiss.sign * extent);
                self.orchestrator.slide_out(&modal.id, from, to);
            }
            None => {
                self.orchestrator
                    .swap(&mut *self.stage, Some(&modal.id), None, kind, Offset::ZERO);
            }
        }

        self.stage
            .set_backdrop(false, Some(Animation::exit(TransitionKind::Fade)));
        if let Some(page) = &self.state.current_page {
            self.stage.set_inert(&page.id, false);
        }

        tracing::info!(modal = %modal.id, "Closed modal");

        if let Some(hooks) = &self.hooks {
            hooks.on_switch_modal(false, &modal, self.state.current_page.as_ref());
        }
    }

    // === Helpers ===

    fn modal_transition(&mut self, modal: &Surface) -> TransitionKind {
        let requested = TransitionKind::requested(
            self.next_transition.take(),
            modal.transition,
            self.config.default_modal_transition,
        );
        resolve(requested, None, self.registry.order_index(modal))
    }

    fn default_page(&self) -> Option<Surface> {
        let id = match &self.config.default_identifier {
            Some(id) => SurfaceId::from(id.as_str()),
            None => self.registry.default_identifier()?,
        };
        self.registry.resolve(id.as_str()).filter(Surface::is_page)
    }

    fn default_identifier_label(&self) -> String {
        self.config
            .default_identifier
            .clone()
            .unwrap_or_else(|| "<first page>".to_string())
    }

    fn origin(&self) -> NavigationOrigin {
        match (&self.issued_marker, self.host.state_marker()) {
            (Some(issued), Some(marker)) if *issued == marker => NavigationOrigin::Programmatic,
            _ => NavigationOrigin::Host,
        }
    }

    fn issue_marker(&mut self) -> String {
        let marker = Uuid::new_v4().to_string();
        self.issued_marker = Some(marker.clone());
        marker
    }

    fn current_fragment(&self) -> Option<String> {
        Href::parse(&self.host.href())
            .ok()
            .map(|href| href.fragment().to_string())
    }

    fn report_drift(&mut self) {
        if let Some(drift) = self.reconciler.take_drift() {
            let err = NavigationError::HistoryDriftSuspected {
                location: drift.location,
                expected: drift.expected,
                actual: drift.actual,
            };
            tracing::warn!("{}, re-derived from host history", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_history::MemoryHistory;
    use folio_surface::{HeadlessStage, SurfaceHooks, SurfaceRegistry, Viewport, Visibility};
    use parking_lot::Mutex;
    use std::sync::Arc;

    const ORIGIN: &str = "https://app.test/";

    #[derive(Clone, Default)]
    struct Log(Arc<Mutex<Vec<String>>>);

    impl Log {
        fn push(&self, entry: String) {
            self.0.lock().push(entry);
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().clone()
        }

        fn contains(&self, entry: &str) -> bool {
            self.0.lock().iter().any(|e| e == entry)
        }

        fn count(&self, prefix: &str) -> usize {
            self.0.lock().iter().filter(|e| e.starts_with(prefix)).count()
        }

        fn clear(&self) {
            self.0.lock().clear();
        }
    }

    fn label(id: Option<&SurfaceId>) -> &str {
        id.map(|id| id.as_str()).unwrap_or("-")
    }

    struct SurfaceRecorder {
        id: &'static str,
        log: Log,
    }

    impl SurfaceHooks for SurfaceRecorder {
        fn on_show(&self, search: &str, referrer: Option<&SurfaceId>) {
            self.log
                .push(format!("{}:show:{}:{}", self.id, search, label(referrer)));
        }

        fn on_hide(&self, next_search: &str, next_id: Option<&SurfaceId>) {
            self.log
                .push(format!("{}:hide:{}:{}", self.id, next_search, label(next_id)));
        }

        fn on_search_change(&self, search: &str) {
            self.log.push(format!("{}:search:{}", self.id, search));
        }

        fn on_update_search(&self, search: &str) {
            self.log.push(format!("{}:update:{}", self.id, search));
        }
    }

    struct AppRecorder {
        log: Log,
    }

    impl NavigationHooks for AppRecorder {
        fn on_switch_page(&self, outgoing: Option<&Surface>, incoming: &Surface) {
            let from = outgoing.map(|s| s.id.as_str()).unwrap_or("-");
            self.log.push(format!("switch:{}->{}", from, incoming.id));
        }

        fn on_switch_modal(&self, opening: bool, modal: &Surface, _page: Option<&Surface>) {
            let verb = if opening { "open" } else { "close" };
            self.log.push(format!("modal:{}:{}", verb, modal.id));
        }

        fn on_update_hash(&self, change: &LocationChange) {
            self.log
                .push(format!("hash:{}", change.routing.to_fragment()));
        }
    }

    struct Harness {
        history: MemoryHistory,
        stage: HeadlessStage,
        log: Log,
        nav: Navigator,
        now: f64,
    }

    impl Harness {
        fn new(config: Config) -> Self {
            Self::at(config, ORIGIN)
        }

        fn at(config: Config, href: &str) -> Self {
            let log = Log::default();
            let registry = registry(&log);
            let history = MemoryHistory::new(href).unwrap();
            let stage = HeadlessStage::new(Viewport::new(400.0, 800.0));
            let nav = Navigator::new(config, registry, history.clone(), stage.clone())
                .with_hooks(AppRecorder { log: log.clone() });

            Self {
                history,
                stage,
                log,
                nav,
                now: 0.0,
            }
        }

        /// Start and settle on the first page
        fn booted(config: Config) -> Self {
            let mut h = Self::new(config);
            h.nav.start();
            h.pump();
            h.finish();
            h.log.clear();
            h
        }

        /// Deliver queued location notifications
        fn pump(&mut self) {
            let mut guard = 0;
            while self.history.take_notification() {
                self.nav.handle_location_change();
                guard += 1;
                assert!(guard < 32, "notification loop");
            }
        }

        /// Let every animation run out
        fn finish(&mut self) {
            for _ in 0..12 {
                self.now += 1000.0;
                self.nav.tick(self.now);
            }
            assert!(self.nav.orchestrator().is_idle());
        }

        fn go(&mut self, id: &str) {
            self.nav.navigate(id, "");
            self.pump();
            self.finish();
        }

        fn page(&self) -> Option<&str> {
            self.nav.current_page().map(|id| id.as_str())
        }

        fn modal(&self) -> Option<&str> {
            self.nav.current_modal().map(|id| id.as_str())
        }

        fn host_depth(&self) -> usize {
            self.history.depth()
        }
    }

    fn registry(log: &Log) -> SurfaceRegistry {
        let registry = SurfaceRegistry::new();
        let recorder = |id: &'static str| {
            Arc::new(SurfaceRecorder {
                id,
                log: log.clone(),
            })
        };

        for id in ["a", "b", "c"] {
            registry
                .register(Surface::page(id).with_hooks(recorder(id)))
                .unwrap();
        }
        registry
            .register(
                Surface::modal("m")
                    .with_transition(TransitionKind::DrawerTop)
                    .with_hooks(recorder("m")),
            )
            .unwrap();
        registry
            .register(Surface::modal("n").with_hooks(recorder("n")))
            .unwrap();
        registry
    }

    fn test_config() -> Config {
        Config {
            swipe_steps: 4,
            ..Config::default()
        }
    }

    #[test]
    fn test_first_load_redirects_to_default() {
        let mut h = Harness::new(test_config());
        h.nav.start();

        assert_eq!(h.history.fragment(), "a");
        assert_eq!(h.history.len(), 1);
        assert_eq!(h.nav.phase(), NavigationPhase::NoSurface);

        h.pump();
        h.finish();

        assert_eq!(h.page(), Some("a"));
        assert_eq!(h.nav.phase(), NavigationPhase::PageShown);
        assert_eq!(h.stage.visible(), vec![SurfaceId::from("a")]);
        assert!(h.log.contains("a:show::-"));
        assert!(h.log.contains("switch:-->a"));
        assert_eq!(h.nav.history().locations(), vec!["a"]);
    }

    #[test]
    fn test_configured_default_identifier() {
        let config = Config {
            default_identifier: Some("b".to_string()),
            ..test_config()
        };
        let mut h = Harness::new(config);
        h.nav.start();
        h.pump();

        assert_eq!(h.page(), Some("b"));
    }

    #[test]
    fn test_unknown_identifier_on_first_load() {
        let mut h = Harness::at(test_config(), "https://app.test/#nowhere");
        h.nav.start();
        h.pump();

        assert_eq!(h.page(), Some("a"));
        assert_eq!(h.history.fragments(), vec!["a"]);
    }

    #[test]
    fn test_deep_link_shows_page_directly() {
        let mut h = Harness::at(test_config(), "https://app.test/#c?tab=2");
        h.nav.start();
        h.pump();

        assert_eq!(h.page(), Some("c"));
        assert_eq!(h.nav.state().current_search, "tab=2");
        assert!(h.log.contains("c:show:tab=2:-"));
        assert_eq!(h.history.len(), 1);
    }

    #[test]
    fn test_order_dependent_slide() {
        let config = Config {
            default_page_transition: TransitionKind::SlideByOrder,
            ..test_config()
        };
        let mut h = Harness::booted(config);

        h.nav.navigate("c", "");
        h.pump();
        assert_eq!(
            h.stage.animation("a").map(|a| a.class_name()),
            Some("slide-out".to_string())
        );
        h.finish();
        assert_eq!(h.page(), Some("c"));

        h.nav.navigate("a", "");
        h.pump();
        assert_eq!(
            h.stage.animation("c").map(|a| a.class_name()),
            Some("slide-reverse-out".to_string())
        );
        h.finish();

        assert_eq!(h.page(), Some("a"));
        assert_eq!(h.stage.visible(), vec![SurfaceId::from("a")]);
        // The link back was folded into the original entry
        assert_eq!(h.nav.history().locations(), vec!["a"]);
        assert_eq!(h.host_depth(), 1);
    }

    #[test]
    fn test_same_page_only_changes_search() {
        let mut h = Harness::booted(test_config());

        h.nav.navigate("a", "q=1");
        h.pump();
        h.finish();

        assert_eq!(h.page(), Some("a"));
        assert_eq!(h.nav.state().current_search, "q=1");
        assert_eq!(
            h.log.entries(),
            vec!["hash:a?q=1".to_string(), "a:search:q=1".to_string()]
        );
    }

    #[test]
    fn test_fresh_navigations_do_not_drift() {
        let mut h = Harness::booted(test_config());

        h.go("b");
        h.go("c");
        h.go("a");

        assert_eq!(h.nav.history().len(), 4);
        assert_eq!(h.host_depth(), 4);
        assert_eq!(h.nav.history().locations(), vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn test_unique_history_collapses_revisit() {
        let config = Config {
            history_unique: true,
            ..test_config()
        };
        let mut h = Harness::booted(config);

        h.go("b");
        h.go("c");
        h.go("a");

        assert_eq!(h.page(), Some("a"));
        assert_eq!(h.nav.history().locations(), vec!["a"]);
        assert_eq!(h.host_depth(), 1);
        assert_eq!(h.history.fragment(), "a");
    }

    #[test]
    fn test_physical_back_is_not_corrected() {
        let mut h = Harness::booted(test_config());
        h.go("b");
        h.go("c");

        h.history.back();
        h.pump();
        h.finish();

        assert_eq!(h.page(), Some("b"));
        // Only the user's own step back happened
        assert_eq!(h.host_depth(), 2);
        assert_eq!(h.history.len(), 3);
        assert_eq!(h.nav.history().locations(), vec!["a", "b"]);
        assert!(h.log.contains("c:hide::b"));
        assert!(h.log.contains("b:show::c"));
    }

    #[test]
    fn test_physical_back_then_forward() {
        let mut h = Harness::booted(test_config());
        h.go("b");

        h.history.back();
        h.pump();
        assert_eq!(h.page(), Some("a"));

        h.history.forward();
        h.pump();
        h.finish();

        assert_eq!(h.page(), Some("b"));
        assert_eq!(h.nav.history().locations(), vec!["a", "b"]);
        assert_eq!(h.host_depth(), 2);
    }

    #[test]
    fn test_link_back_is_corrected() {
        let mut h = Harness::booted(test_config());
        h.go("b");

        // A plain <a href="#a"> pushes without a marker
        h.history.follow_link("a");
        h.pump();
        h.finish();

        assert_eq!(h.page(), Some("a"));
        assert_eq!(h.host_depth(), 1);
        assert_eq!(h.nav.history().locations(), vec!["a"]);
    }

    #[test]
    fn test_unknown_identifier_goes_back() {
        let mut h = Harness::booted(test_config());
        h.go("b");

        h.history.follow_link("missing");
        h.pump();
        h.finish();

        assert_eq!(h.page(), Some("b"));
        assert_eq!(h.history.fragment(), "b");
        assert_eq!(h.host_depth(), 2);
    }

    #[test]
    fn test_unknown_identifier_while_modal_open_closes_modal() {
        let mut h = Harness::booted(test_config());
        h.go("m");
        h.log.clear();

        h.history.follow_link("missing");
        h.pump();
        h.finish();

        assert_eq!(h.modal(), None);
        assert_eq!(h.page(), Some("a"));
        assert_eq!(h.host_depth(), 1);
        assert_eq!(h.log.count("m:update"), 0);
        assert!(h.log.contains("modal:close:m"));
        assert!(!h.stage.is_visible("m"));
    }

    #[test]
    fn test_non_ascii_identifier_and_search_pass_through() {
        let log = Log::default();
        let registry = SurfaceRegistry::new();
        registry.register_page("a").unwrap();
        registry
            .register(Surface::page("café").with_hooks(Arc::new(SurfaceRecorder {
                id: "café",
                log: log.clone(),
            })))
            .unwrap();
        let history = MemoryHistory::new(ORIGIN).unwrap();
        let mut nav = Navigator::new(test_config(), registry, history.clone(), HeadlessStage::default());
        let pump = |nav: &mut Navigator| {
            while history.take_notification() {
                nav.handle_location_change();
            }
        };

        nav.start();
        pump(&mut nav);
        nav.navigate("café", "q=x y");
        pump(&mut nav);

        assert_eq!(nav.current_page().map(|id| id.as_str()), Some("café"));
        assert_eq!(nav.state().current_search, "q=x y");
        assert!(log.contains("café:show:q=x y:a"));
        assert_eq!(history.fragments(), vec!["a", "café?q=x y"]);
        assert_eq!(nav.history().locations(), vec!["a", "café?q=x y"]);
    }

    #[test]
    fn test_repeated_navigation_with_escaped_search_adds_no_entry() {
        let mut h = Harness::booted(test_config());

        h.nav.navigate("b", "q=x y");
        h.pump();
        h.finish();
        h.nav.navigate("b", "q=x y");
        h.pump();
        h.finish();

        assert_eq!(h.history.len(), 2);
        assert_eq!(h.host_depth(), 2);
        assert_eq!(h.nav.history().locations(), vec!["a", "b?q=x y"]);
    }

    #[test]
    fn test_unknown_identifier_at_bottom_restores_page() {
        let mut h = Harness::booted(test_config());

        h.nav.replace("missing", "");
        h.pump();

        assert_eq!(h.page(), Some("a"));
        assert_eq!(h.history.fragments(), vec!["a"]);
    }

    #[test]
    fn test_modal_keeps_page_and_closes_without_reshowing() {
        let mut h = Harness::booted(test_config());

        h.go("m");
        assert_eq!(h.page(), Some("a"));
        assert_eq!(h.modal(), Some("m"));
        assert_eq!(h.nav.phase(), NavigationPhase::PageShownWithModal);
        assert!(h.stage.is_visible("a"));
        assert!(h.stage.is_visible("m"));
        assert!(h.stage.is_inert("a"));
        assert!(h.stage.backdrop_visible());
        assert_eq!(h.nav.modal_session().unwrap().opened_at_depth, 2);
        assert!(h.log.contains("m:show::a"));
        assert!(h.log.contains("modal:open:m"));

        h.nav.close_modal();
        h.pump();
        h.finish();

        assert_eq!(h.page(), Some("a"));
        assert_eq!(h.modal(), None);
        assert!(!h.stage.is_visible("m"));
        assert!(!h.stage.is_inert("a"));
        assert!(!h.stage.backdrop_visible());
        assert_eq!(h.host_depth(), 1);
        assert!(h.log.contains("modal:close:m"));
        assert_eq!(h.log.count("a:"), 0);
        assert_eq!(h.nav.history().locations(), vec!["a"]);
    }

    #[test]
    fn test_modal_open_animates_directionally() {
        let mut h = Harness::booted(test_config());

        h.nav.navigate("m", "");
        h.pump();

        assert_eq!(
            h.stage.animation("m").map(|a| a.class_name()),
            Some("drawer-top-in".to_string())
        );
        assert!(h.stage.animation("a").is_none());
    }

    #[test]
    fn test_physical_back_closes_modal() {
        let mut h = Harness::booted(test_config());
        h.go("m");

        h.history.back();
        h.pump();
        h.finish();

        assert_eq!(h.modal(), None);
        assert_eq!(h.page(), Some("a"));
        assert_eq!(h.log.count("a:"), 0);
    }

    #[test]
    fn test_same_modal_updates_search() {
        let mut h = Harness::booted(test_config());
        h.go("m");

        h.nav.navigate("m", "step=2");
        h.pump();

        assert!(h.log.contains("m:update:step=2"));
        assert_eq!(h.log.count("m:show"), 1);
        assert_eq!(h.nav.modal_session().unwrap().search, "step=2");

        // Both modal entries are popped on close
        h.nav.close_modal();
        h.pump();
        h.finish();
        assert_eq!(h.host_depth(), 1);
        assert_eq!(h.modal(), None);
    }

    #[test]
    fn test_switch_modal_keeps_open_depth() {
        let mut h = Harness::booted(test_config());
        h.go("m");
        h.go("n");

        assert_eq!(h.modal(), Some("n"));
        assert!(!h.stage.is_visible("m"));
        assert!(h.stage.is_visible("n"));
        assert!(h.log.contains("m:hide::n"));
        assert!(h.log.contains("n:show::m"));
        assert_eq!(h.nav.modal_session().unwrap().opened_at_depth, 2);

        h.nav.close_modal();
        h.pump();
        h.finish();

        assert_eq!(h.modal(), None);
        assert_eq!(h.host_depth(), 1);
        assert_eq!(h.page(), Some("a"));
    }

    #[test]
    fn test_page_while_modal_open_backs_out_first() {
        let mut h = Harness::booted(test_config());
        h.go("m");

        h.nav.navigate("b", "");
        h.pump();
        h.finish();

        assert_eq!(h.page(), Some("b"));
        assert_eq!(h.modal(), None);
        assert!(h.nav.pending_suppression().is_none());
        assert_eq!(h.history.fragments(), vec!["a", "b"]);
        assert_eq!(h.host_depth(), 2);
        assert_eq!(h.nav.history().locations(), vec!["a", "b"]);
        assert_eq!(h.stage.visible(), vec![SurfaceId::from("b")]);
        assert!(h.log.contains("modal:close:m"));
        assert!(h.log.contains("switch:a->b"));
        assert_eq!(h.log.count("b:show"), 1);
    }

    #[test]
    fn test_modal_redirect_suppression_consumed_once() {
        let mut h = Harness::booted(test_config());
        h.go("m");

        h.nav.navigate("b", "");
        assert!(h.history.take_notification());
        h.nav.handle_location_change();

        assert_eq!(
            h.nav.pending_suppression(),
            Some(&PendingSuppression::ModalRedirect {
                fragment: "b".to_string()
            })
        );
        assert_eq!(h.page(), Some("a"));

        assert!(h.history.take_notification());
        h.nav.handle_location_change();
        assert!(h.nav.pending_suppression().is_none());
        // The landing on the page entry itself did not switch anything
        assert_eq!(h.page(), Some("a"));

        h.pump();
        assert_eq!(h.page(), Some("b"));
    }

    #[test]
    fn test_unmanaged_page_while_modal_open_switches_directly() {
        let config = Config {
            history_managed: false,
            ..test_config()
        };
        let mut h = Harness::booted(config);
        h.go("m");
        h.go("b");

        assert_eq!(h.page(), Some("b"));
        assert_eq!(h.modal(), None);
        assert_eq!(h.history.fragments(), vec!["a", "m", "b"]);
        assert!(h.nav.history().is_empty());
    }

    #[test]
    fn test_unmanaged_history_never_corrects() {
        let config = Config {
            history_managed: false,
            ..test_config()
        };
        let mut h = Harness::booted(config);
        h.go("b");
        h.go("a");

        assert_eq!(h.page(), Some("a"));
        assert_eq!(h.host_depth(), 3);
    }

    #[test]
    fn test_default_page_firstly() {
        let config = Config {
            default_page_firstly: true,
            ..test_config()
        };
        let mut h = Harness::at(config, "https://app.test/#c");
        h.nav.start();
        h.pump();
        h.finish();

        assert_eq!(h.page(), Some("c"));
        assert_eq!(h.history.fragments(), vec!["a", "c"]);
        assert_eq!(h.nav.history().locations(), vec!["a", "c"]);

        h.history.back();
        h.pump();
        assert_eq!(h.page(), Some("a"));
    }

    #[test]
    fn test_default_page_firstly_ignores_default_link() {
        let config = Config {
            default_page_firstly: true,
            ..test_config()
        };
        let mut h = Harness::at(config, "https://app.test/#a");
        h.nav.start();
        h.pump();

        assert_eq!(h.page(), Some("a"));
        assert_eq!(h.history.fragments(), vec!["a"]);
    }

    #[test]
    fn test_modal_deep_link_seats_default_page() {
        let mut h = Harness::at(test_config(), "https://app.test/#m?step=1");
        h.nav.start();
        h.pump();
        h.finish();

        assert_eq!(h.page(), Some("a"));
        assert_eq!(h.modal(), Some("m"));
        assert_eq!(h.history.fragments(), vec!["a", "m?step=1"]);
        assert!(h.log.contains("m:show:step=1:a"));

        h.nav.close_modal();
        h.pump();
        assert_eq!(h.modal(), None);
        assert_eq!(h.history.fragment(), "a");
    }

    #[test]
    fn test_next_transition_is_one_shot() {
        let mut h = Harness::booted(test_config());

        h.nav.set_next_transition(TransitionKind::Pop);
        h.nav.navigate("b", "");
        h.pump();
        assert_eq!(
            h.stage.animation("a").map(|a| a.class_name()),
            Some("pop-out".to_string())
        );
        assert_eq!(h.nav.next_transition(), None);
        h.finish();

        h.nav.navigate("c", "");
        h.pump();
        assert_eq!(
            h.stage.animation("b").map(|a| a.class_name()),
            Some("fade-out".to_string())
        );
    }

    #[test]
    fn test_surface_preference_beats_default() {
        let log = Log::default();
        let registry = SurfaceRegistry::new();
        registry.register_page("a").unwrap();
        registry
            .register(Surface::page("b").with_transition(TransitionKind::Flip))
            .unwrap();
        let history = MemoryHistory::new(ORIGIN).unwrap();
        let stage = HeadlessStage::default();
        let mut nav = Navigator::new(test_config(), registry, history.clone(), stage.clone())
            .with_hooks(AppRecorder { log: log.clone() });

        nav.start();
        while history.take_notification() {
            nav.handle_location_change();
        }
        nav.tick(5000.0);
        nav.tick(10000.0);

        nav.navigate("b", "");
        while history.take_notification() {
            nav.handle_location_change();
        }
        assert_eq!(
            stage.animation("a").map(|a| a.class_name()),
            Some("flip-out".to_string())
        );
    }

    #[test]
    fn test_animation_end_drives_transition() {
        let mut h = Harness::booted(test_config());

        h.nav.navigate("b", "");
        h.pump();
        assert!(h.stage.is_visible("a"));
        assert!(!h.stage.is_visible("b"));

        assert!(h.nav.animation_finished("a"));
        assert!(!h.stage.is_visible("a"));
        assert!(h.stage.is_visible("b"));

        assert!(h.nav.animation_finished("b"));
        assert!(h.nav.is_idle());
        assert_eq!(h.nav.orchestrator().visibility(&SurfaceId::from("b")), Visibility::Shown);
    }

    #[test]
    fn test_fallback_timer_completes_switch() {
        let mut h = Harness::booted(test_config());

        h.nav.navigate("b", "");
        h.pump();

        h.now += 1000.0;
        h.nav.tick(h.now);
        assert!(!h.stage.is_visible("a"));
        assert!(h.stage.is_visible("b"));

        h.now += 1000.0;
        h.nav.tick(h.now);
        assert!(h.nav.is_idle());
    }

    #[test]
    fn test_rapid_navigation_settles_on_last_page() {
        let mut h = Harness::booted(test_config());

        h.nav.navigate("b", "");
        h.pump();
        h.nav.navigate("c", "");
        h.pump();
        h.finish();

        assert_eq!(h.page(), Some("c"));
        assert_eq!(h.stage.visible(), vec![SurfaceId::from("c")]);
    }

    #[test]
    fn test_duplicate_notification_ignored() {
        let mut h = Harness::booted(test_config());
        h.go("b");
        h.log.clear();

        h.nav.handle_location_change();
        h.nav.handle_location_change();

        assert!(h.log.entries().is_empty());
        assert_eq!(h.nav.history().len(), 2);
    }

    #[test]
    fn test_update_hash_sees_every_distinct_change() {
        let mut h = Harness::booted(test_config());
        h.go("b");
        h.go("c");

        assert_eq!(h.log.count("hash:"), 2);
        assert!(h.log.contains("hash:b"));
        assert!(h.log.contains("hash:c"));
    }

    fn swipe_config() -> Config {
        Config {
            swipe: crate::SwipeConfig {
                page: true,
                modal: true,
            },
            ..test_config()
        }
    }

    #[test]
    fn test_swipe_disabled_by_default() {
        let mut h = Harness::booted(test_config());
        assert!(!h.nav.pointer_down(PointerSource::Touch, 300.0, 100.0, 0.0));
    }

    #[test]
    fn test_short_swipe_restores_page() {
        let mut h = Harness::booted(swipe_config());

        assert!(h.nav.pointer_down(PointerSource::Touch, 300.0, 100.0, h.now));
        h.nav.pointer_move(220.0, 104.0);
        assert!(h.stage.is_visible("b"));

        let outcome = h.nav.pointer_up(h.now + 50.0);
        assert!(matches!(outcome, SwipeOutcome::Cancelled));
        h.finish();

        assert_eq!(h.page(), Some("a"));
        assert_eq!(h.stage.offset("a"), Offset::ZERO);
        assert_eq!(h.stage.offset("b"), Offset::ZERO);
        assert!(!h.stage.is_visible("b"));
        assert_eq!(h.host_depth(), 1);
    }

    #[test]
    fn test_long_swipe_switches_to_neighbour() {
        let mut h = Harness::booted(swipe_config());

        h.nav.pointer_down(PointerSource::Touch, 350.0, 100.0, h.now);
        h.nav.pointer_move(150.0, 110.0);
        let outcome = h.nav.pointer_up(h.now + 80.0);
        assert!(outcome.is_commit());
        assert_eq!(h.nav.next_transition(), Some(TransitionKind::Swipe));

        h.pump();
        assert_eq!(h.nav.next_transition(), None);
        // Continues from where the finger left the pages
        assert_eq!(h.stage.offset("b"), Offset::horizontal(200.0));

        h.finish();
        assert_eq!(h.page(), Some("b"));
        assert_eq!(h.stage.visible(), vec![SurfaceId::from("b")]);
        assert_eq!(h.stage.offset("a"), Offset::ZERO);
        assert_eq!(h.stage.offset("b"), Offset::ZERO);
        assert_eq!(h.nav.history().locations(), vec!["a", "b"]);
    }

    #[test]
    fn test_swipe_to_previous_page() {
        let mut h = Harness::booted(swipe_config());
        h.go("b");

        h.nav.pointer_down(PointerSource::Touch, 50.0, 100.0, h.now);
        h.nav.pointer_move(250.0, 100.0);
        h.nav.pointer_up(h.now + 80.0);
        h.pump();
        h.finish();

        assert_eq!(h.page(), Some("a"));
        // Same as a link back: folded into the original entry
        assert_eq!(h.nav.history().locations(), vec!["a"]);
        assert_eq!(h.host_depth(), 1);
    }

    #[test]
    fn test_swipe_dismisses_modal() {
        let mut h = Harness::booted(swipe_config());
        h.go("m");

        assert!(h.nav.pointer_down(PointerSource::Touch, 200.0, 100.0, h.now));
        h.nav.pointer_move(200.0, 500.0);
        assert_eq!(h.stage.offset("m"), Offset::new(0.0, 400.0));

        let outcome = h.nav.pointer_up(h.now + 100.0);
        assert!(matches!(outcome, SwipeOutcome::DismissModal { .. }));

        h.pump();
        h.finish();

        assert_eq!(h.modal(), None);
        assert_eq!(h.page(), Some("a"));
        assert!(!h.stage.is_visible("m"));
        assert_eq!(h.stage.offset("m"), Offset::ZERO);
        assert_eq!(h.host_depth(), 1);
    }

    #[test]
    fn test_modal_without_direction_cannot_swipe() {
        let mut h = Harness::booted(swipe_config());
        h.go("n");

        assert!(!h.nav.pointer_down(PointerSource::Touch, 200.0, 100.0, h.now));
    }

    #[test]
    fn test_navigation_aborts_active_gesture() {
        let mut h = Harness::booted(swipe_config());
        h.go("b");

        h.nav.pointer_down(PointerSource::Touch, 300.0, 100.0, h.now);
        h.nav.pointer_move(250.0, 100.0);
        assert!(h.stage.is_visible("c"));

        h.history.back();
        h.pump();
        h.finish();

        assert!(!h.nav.gesture().is_tracking());
        assert_eq!(h.page(), Some("a"));
        assert!(!h.stage.is_visible("c"));
        assert_eq!(h.stage.offset("b"), Offset::ZERO);
    }

    #[test]
    fn test_reset() {
        let mut h = Harness::booted(test_config());
        h.go("b");
        h.go("m");

        h.nav.reset();

        assert_eq!(h.nav.phase(), NavigationPhase::NoSurface);
        assert!(h.stage.visible().is_empty());
        assert!(!h.stage.backdrop_visible());
        assert!(h.nav.history().is_empty());

        // Starts over from the live location
        h.nav.start();
        h.pump();
        assert_eq!(h.modal(), Some("m"));
        assert_eq!(h.page(), Some("a"));
    }

    #[test]
    fn test_shadow_history_survives_reload() {
        let db = Database::open_in_memory().unwrap();
        let log = Log::default();
        let history = MemoryHistory::new(ORIGIN).unwrap();

        {
            let mut nav = Navigator::with_store(
                test_config(),
                registry(&log),
                history.clone(),
                HeadlessStage::default(),
                db.clone(),
            )
            .unwrap();
            nav.start();
            while history.take_notification() {
                nav.handle_location_change();
            }
            nav.navigate("b", "");
            while history.take_notification() {
                nav.handle_location_change();
            }
            assert_eq!(nav.history().locations(), vec!["a", "b"]);
        }

        let mut nav = Navigator::with_store(
            test_config(),
            registry(&log),
            history.clone(),
            HeadlessStage::default(),
            db,
        )
        .unwrap();
        assert_eq!(nav.history().locations(), vec!["a", "b"]);

        // Back after the reload is still recognised as the user's
        nav.start();
        history.back();
        while history.take_notification() {
            nav.handle_location_change();
        }
        assert_eq!(nav.current_page().map(|id| id.as_str()), Some("a"));
        assert_eq!(history.depth(), 1);
    }
}
