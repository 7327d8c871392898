//! Host history primitives
//!
//! [`HistoryHost`] is what the engine consumes from the host's
//! back/forward stack. [`MemoryHistory`] implements it without a browser.

use parking_lot::Mutex;
use std::sync::Arc;

use folio_location::Href;

use crate::Result;

/// Whether a location change was issued by the engine itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOrigin {
    /// The host's current entry carries the last state marker the engine wrote
    Programmatic,
    /// Link click, physical back/forward, address bar
    Host,
}

/// Back/forward stack of the host.
///
/// Every mutation must eventually be followed by a location-change
/// notification to the controller, possibly after the call returns.
pub trait HistoryHost {
    /// Full current location, including the fragment
    fn href(&self) -> String;

    /// Entries up to and including the current one.
    ///
    /// Only ever compared with an earlier reading, never trusted as an
    /// absolute count.
    fn depth(&self) -> usize;

    /// Opaque marker stored with the current entry
    fn state_marker(&self) -> Option<String>;

    /// Add an entry for `fragment`, discarding forward entries
    fn push(&mut self, fragment: &str, marker: Option<&str>);

    /// Overwrite the current entry
    fn replace(&mut self, fragment: &str, marker: Option<&str>);

    /// Move through the stack; negative is back
    fn go(&mut self, delta: i32);
}

#[derive(Debug, Clone)]
struct Entry {
    href: Href,
    marker: Option<String>,
}

#[derive(Debug)]
struct Inner {
    entries: Vec<Entry>,
    cursor: usize,
    notifications: usize,
}

impl Inner {
    fn current(&self) -> &Entry {
        &self.entries[self.cursor]
    }
}

/// In-memory host history.
///
/// Mutations queue notifications instead of delivering them, the way a
/// browser fires `hashchange` after the call returns. Drivers pump them
/// with [`MemoryHistory::take_notification`].
pub struct MemoryHistory {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryHistory {
    /// Start with a single entry at `href`
    pub fn new(href: &str) -> Result<Self> {
        let href = Href::parse(href)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: vec![Entry { href, marker: None }],
                cursor: 0,
                notifications: 0,
            })),
        })
    }

    /// Physical back button
    pub fn back(&self) {
        self.move_cursor(-1);
    }

    /// Physical forward button
    pub fn forward(&self) {
        self.move_cursor(1);
    }

    /// User followed a plain `<a href="#...">` link
    pub fn follow_link(&self, fragment: &str) {
        self.push_entry(fragment, None);
    }

    /// Consume one pending notification
    pub fn take_notification(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.notifications == 0 {
            return false;
        }
        inner.notifications -= 1;
        true
    }

    pub fn pending_notifications(&self) -> usize {
        self.inner.lock().notifications
    }

    /// Fragments of every entry, bottom first
    pub fn fragments(&self) -> Vec<String> {
        self.inner
            .lock()
            .entries
            .iter()
            .map(|e| e.href.fragment().to_string())
            .collect()
    }

    /// Fragment of the current entry
    pub fn fragment(&self) -> String {
        self.inner.lock().current().href.fragment().to_string()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    fn push_entry(&self, fragment: &str, marker: Option<&str>) {
        let mut inner = self.inner.lock();
        let href = inner.current().href.with_fragment(fragment);
        let keep = inner.cursor + 1;
        inner.entries.truncate(keep);
        inner.entries.push(Entry {
            href,
            marker: marker.map(str::to_string),
        });
        inner.cursor += 1;
        inner.notifications += 1;
    }

    fn move_cursor(&self, delta: i32) {
        let mut inner = self.inner.lock();
        let target = inner.cursor as i64 + delta as i64;
        // Out of range moves are ignored, as in browsers
        if target < 0 || target >= inner.entries.len() as i64 || delta == 0 {
            tracing::trace!(delta, "Ignored out of range history move");
            return;
        }
        inner.cursor = target as usize;
        inner.notifications += 1;
    }
}

impl HistoryHost for MemoryHistory {
    fn href(&self) -> String {
        self.inner.lock().current().href.to_string()
    }

    fn depth(&self) -> usize {
        self.inner.lock().cursor + 1
    }

    fn state_marker(&self) -> Option<String> {
        self.inner.lock().current().marker.clone()
    }

    fn push(&mut self, fragment: &str, marker: Option<&str>) {
        self.push_entry(fragment, marker);
    }

    fn replace(&mut self, fragment: &str, marker: Option<&str>) {
        let mut inner = self.inner.lock();
        let href = inner.current().href.with_fragment(fragment);
        let cursor = inner.cursor;
        inner.entries[cursor] = Entry {
            href,
            marker: marker.map(str::to_string),
        };
        inner.notifications += 1;
    }

    fn go(&mut self, delta: i32) {
        self.move_cursor(delta);
    }
}

impl Clone for MemoryHistory {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
