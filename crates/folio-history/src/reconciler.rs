//! Shadow history stack

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use folio_storage::{Database, StoredEntry};

use crate::host::NavigationOrigin;
use crate::Result;

/// Host location recorded when a page navigation was accepted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub location: String,
    /// Host depth at the time the entry was recorded
    pub depth: usize,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(location: impl Into<String>, depth: usize) -> Self {
        Self {
            location: location.into(),
            depth,
            recorded_at: Utc::now(),
        }
    }
}

impl From<StoredEntry> for HistoryEntry {
    fn from(entry: StoredEntry) -> Self {
        Self {
            location: entry.location,
            depth: entry.depth,
            recorded_at: entry.recorded_at,
        }
    }
}

impl From<&HistoryEntry> for StoredEntry {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            location: entry.location.clone(),
            depth: entry.depth,
            recorded_at: entry.recorded_at,
        }
    }
}

/// Outcome of accepting one page navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// History management is off
    Unmanaged,
    /// Location is already the top entry (duplicate notification, or a
    /// correction landing)
    Settled,
    /// New entry appended
    Fresh,
    /// Returned to an entry `distance` steps below the previous top.
    /// `correction` is the `go` delta the host still needs, `None` when the
    /// user's own back navigation already moved it.
    Back {
        distance: usize,
        correction: Option<i32>,
    },
}

impl Reconciliation {
    pub fn correction(&self) -> Option<i32> {
        match self {
            Reconciliation::Back { correction, .. } => *correction,
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Reconciliation::Settled)
    }
}

/// Expected and observed host depth disagreed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drift {
    pub location: String,
    pub expected: usize,
    pub actual: usize,
}

struct Binding {
    db: Database,
    scope: String,
}

pub struct HistoryReconciler {
    stack: Vec<HistoryEntry>,
    managed: bool,
    unique: bool,
    binding: Option<Binding>,
    drift: Option<Drift>,
}

impl HistoryReconciler {
    pub fn new(managed: bool, unique: bool) -> Self {
        Self {
            stack: Vec::new(),
            managed,
            unique,
            binding: None,
            drift: None,
        }
    }

    /// Bind to a database and restore the stack saved for `scope`.
    ///
    /// Every later mutation is saved back (auto-save).
    pub fn with_store(managed: bool, unique: bool, db: Database, scope: &str) -> Result<Self> {
        let stack: Vec<HistoryEntry> = db
            .load_history(scope)?
            .into_iter()
            .map(HistoryEntry::from)
            .collect();

        tracing::info!(scope = %scope, entries = stack.len(), "Restored shadow history");

        Ok(Self {
            stack,
            managed,
            unique,
            binding: Some(Binding {
                db,
                scope: scope.to_string(),
            }),
            drift: None,
        })
    }

    pub fn is_managed(&self) -> bool {
        self.managed
    }

    pub fn stack(&self) -> &[HistoryEntry] {
        &self.stack
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn top(&self) -> Option<&HistoryEntry> {
        self.stack.last()
    }

    /// Locations bottom first
    pub fn locations(&self) -> Vec<&str> {
        self.stack.iter().map(|e| e.location.as_str()).collect()
    }

    /// Forget everything (and the persisted copy)
    pub fn reset(&mut self) {
        self.stack.clear();
        self.drift = None;
        self.persist();
    }

    /// Depth disagreement seen by the last `accept`, if any.
    ///
    /// The stack has already been re-derived from the host depth.
    pub fn take_drift(&mut self) -> Option<Drift> {
        self.drift.take()
    }

    /// Classify a page navigation to `location`, observed at host `depth`,
    /// and update the shadow stack.
    pub fn accept(
        &mut self,
        location: &str,
        depth: usize,
        origin: NavigationOrigin,
    ) -> Reconciliation {
        if !self.managed {
            return Reconciliation::Unmanaged;
        }

        self.drift = None;

        if let Some(top) = self.stack.last_mut() {
            if top.location == location {
                if top.depth != depth {
                    let expected = std::mem::replace(&mut top.depth, depth);
                    self.record_drift(location, expected, depth);
                    self.persist();
                }
                return Reconciliation::Settled;
            }
        }

        let reconciliation = match self.find_back_target(location) {
            Some(index) => self.pop_to(index, depth, origin),
            None => self.append(location, depth),
        };

        self.persist();

        tracing::debug!(
            location = %location,
            depth,
            stack_len = self.stack.len(),
            ?reconciliation,
            "Reconciled history"
        );

        reconciliation
    }

    /// Index of the entry this navigation returns to, if any
    fn find_back_target(&self, location: &str) -> Option<usize> {
        let len = self.stack.len();
        if len >= 2 && self.stack[len - 2].location == location {
            return Some(len - 2);
        }

        if self.unique {
            return self.stack[..len.saturating_sub(1)]
                .iter()
                .rposition(|entry| entry.location == location);
        }

        None
    }

    fn pop_to(&mut self, index: usize, depth: usize, origin: NavigationOrigin) -> Reconciliation {
        let distance = self.stack.len() - 1 - index;
        let top_depth = self.stack[self.stack.len() - 1].depth;
        let target_depth = self.stack[index].depth;

        self.stack.truncate(index + 1);

        // The host shrank on its own: the user went back, nothing to replay
        let physical = origin == NavigationOrigin::Host && depth < top_depth;
        if physical {
            if depth != target_depth {
                self.stack[index].depth = depth;
                let location = self.stack[index].location.clone();
                self.record_drift(&location, target_depth, depth);
            }
            return Reconciliation::Back {
                distance,
                correction: None,
            };
        }

        if depth != top_depth + 1 {
            let location = self.stack[index].location.clone();
            self.record_drift(&location, top_depth + 1, depth);
        }

        // Normally -(distance + 1): the link itself added one entry
        let delta = target_depth as i64 - depth as i64;
        let correction = if delta < 0 {
            Some(delta as i32)
        } else {
            self.stack[index].depth = depth;
            None
        };

        Reconciliation::Back {
            distance,
            correction,
        }
    }

    fn append(&mut self, location: &str, depth: usize) -> Reconciliation {
        let before = self.stack.len();

        // Entries at or above the live depth no longer exist on the host
        self.stack.retain(|entry| entry.depth < depth);

        if let Some(top) = self.stack.last() {
            if top.depth + 1 != depth || self.stack.len() != before {
                tracing::debug!(
                    top_depth = top.depth,
                    depth,
                    dropped = before - self.stack.len(),
                    "Re-derived shadow history from host depth"
                );
            }
        }

        self.stack.push(HistoryEntry::new(location, depth));
        Reconciliation::Fresh
    }

    fn record_drift(&mut self, location: &str, expected: usize, actual: usize) {
        tracing::debug!(
            location = %location,
            expected,
            actual,
            "Host depth disagrees with shadow stack"
        );
        self.drift = Some(Drift {
            location: location.to_string(),
            expected,
            actual,
        });
    }

    fn persist(&self) {
        let Some(binding) = &self.binding else {
            return;
        };

        let entries: Vec<StoredEntry> = self.stack.iter().map(StoredEntry::from).collect();
        if let Err(e) = binding.db.save_history(&binding.scope, &entries) {
            tracing::error!(scope = %binding.scope, "Failed to save shadow history: {}", e);
        }
    }
}
