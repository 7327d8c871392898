//! Fragment codec
//!
//! `decode` never fails: a fragment without an identifier simply yields
//! `identifier: None`, which the controller treats as "no match".

use serde::{Deserialize, Serialize};

/// Decoded `(identifier, search)` pair
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoutingString {
    /// Registry key, `None` when the fragment names nothing
    pub identifier: Option<String>,
    /// Opaque payload after the first `?`, passed through verbatim
    pub search: String,
}

impl RoutingString {
    pub fn new(identifier: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            search: search.into(),
        }
    }

    /// Encode back into a fragment (without the leading `#`)
    pub fn to_fragment(&self) -> String {
        match &self.identifier {
            Some(id) => encode(id, &self.search),
            None if self.search.is_empty() => String::new(),
            None => format!("?{}", self.search),
        }
    }

    /// Parse the search payload as `key=value` pairs.
    ///
    /// Pairs without `=` or with an empty key are skipped.
    pub fn params(&self) -> Vec<(String, String)> {
        self.search
            .split('&')
            .filter(|pair| matches!(pair.find('='), Some(idx) if idx > 0))
            .flat_map(|pair| url::form_urlencoded::parse(pair.as_bytes()))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    /// Look up a single search parameter
    pub fn param(&self, key: &str) -> Option<String> {
        self.params()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

/// Split a fragment (with or without the leading `#`) on its first `?`
pub fn decode(fragment: &str) -> RoutingString {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);

    let (identifier, search) = match fragment.split_once('?') {
        Some((identifier, search)) => (identifier, search),
        None => (fragment, ""),
    };

    RoutingString {
        identifier: if identifier.is_empty() {
            None
        } else {
            Some(identifier.to_string())
        },
        search: search.to_string(),
    }
}

/// Build a fragment (without the leading `#`), omitting `?` for an empty search
pub fn encode(identifier: &str, search: &str) -> String {
    if search.is_empty() {
        identifier.to_string()
    } else {
        format!("{}?{}", identifier, search)
    }
}
