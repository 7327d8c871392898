//! Host location wrapper

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::codec::{decode, RoutingString};
use crate::error::LocationError;
use crate::Result;

/// A parsed host location (`scheme://host/path#fragment`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Href {
    url: Url,
}

impl Href {
    pub fn parse(input: &str) -> Result<Self> {
        Url::parse(input)
            .map(|url| Self { url })
            .map_err(|e| LocationError::InvalidHref(format!("{}: {}", input, e)))
    }

    /// Fragment without the leading `#`, percent-decoded, empty when absent
    pub fn fragment(&self) -> Cow<'_, str> {
        percent_decode_str(self.raw_fragment()).decode_utf8_lossy()
    }

    /// Fragment as the host serializes it
    pub fn raw_fragment(&self) -> &str {
        self.url.fragment().unwrap_or("")
    }

    pub fn routing(&self) -> RoutingString {
        decode(&self.fragment())
    }

    /// Same document, different fragment
    pub fn with_fragment(&self, fragment: &str) -> Self {
        let mut url = self.url.clone();
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        url.set_fragment(Some(fragment));
        Self { url }
    }

    /// The document part, without any fragment
    pub fn base(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url.to_string()
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl std::fmt::Display for Href {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

impl std::str::FromStr for Href {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
