//! # Media Types
//!
//! Media types are opaque tokens. `*/*` is a literal like any other; the only
//! place it may match other types is the comparator's explicit
//! `MediaTypePolicy::WildcardMatchesAny`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// A normalized content-type token, e.g. `application/json`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MediaType(String);

impl MediaType {
    /// Wire value of the "anything" media type.
    pub const ALL_VALUE: &'static str = "*/*";
    /// Wire value of JSON.
    pub const APPLICATION_JSON_VALUE: &'static str = "application/json";
    /// Wire value of plain text.
    pub const TEXT_PLAIN_VALUE: &'static str = "text/plain";
    /// Wire value of url-encoded forms.
    pub const FORM_URLENCODED_VALUE: &'static str = "application/x-www-form-urlencoded";

    /// Normalizes `raw`.
    ///
    /// The `type/subtype` essence is lower-cased; parameters keep their case
    /// but lose the whitespace around `;` and `=`.
    pub fn new(raw: &str) -> Self {
        let mut pieces = raw.split(';');
        let essence = pieces.next().unwrap_or_default().trim().to_ascii_lowercase();
        let mut out = essence;
        for param in pieces {
            let param = param.trim();
            if param.is_empty() {
                continue;
            }
            out.push(';');
            match param.split_once('=') {
                Some((key, value)) => {
                    out.push_str(key.trim());
                    out.push('=');
                    out.push_str(value.trim());
                }
                None => out.push_str(param),
            }
        }
        MediaType(out)
    }

    /// `*/*`
    pub fn all() -> Self {
        MediaType(Self::ALL_VALUE.to_string())
    }

    /// `application/json`
    pub fn application_json() -> Self {
        MediaType(Self::APPLICATION_JSON_VALUE.to_string())
    }

    /// `text/plain`
    pub fn text_plain() -> Self {
        MediaType(Self::TEXT_PLAIN_VALUE.to_string())
    }

    /// Whether this is exactly `*/*`.
    pub fn is_wildcard(&self) -> bool {
        self.0 == Self::ALL_VALUE
    }

    /// The normalized token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaType {
    fn from(raw: &str) -> Self {
        MediaType::new(raw)
    }
}

impl Serialize for MediaType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MediaType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(MediaType::new(&raw))
    }
}

/// An ordered set of media types.
pub type MediaTypeSet = BTreeSet<MediaType>;

/// Builds a set from raw strings.
pub fn media_types<'a>(raw: impl IntoIterator<Item = &'a str>) -> MediaTypeSet {
    raw.into_iter().map(MediaType::new).collect()
}

/// Resolves an override chain.
///
/// `scopes` lists declarations from the most specific scope (function) to
/// the least specific (global default). The first declared value wins as-is,
/// even when it is an empty set; values are never merged. With nothing
/// declared anywhere the result is the empty set ("no restriction").
pub fn resolve_media_types(scopes: &[Option<&MediaTypeSet>]) -> MediaTypeSet {
    scopes
        .iter()
        .find_map(|scope| *scope)
        .cloned()
        .unwrap_or_default()
}
