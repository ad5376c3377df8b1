//! # Path Templates
//!
//! Splits raw path text into literal and `{name}` placeholder parts and
//! renders the canonical form used as the comparison key.
//!
//! Canonical form rules:
//! - always starts with `/`, never ends with `/` (except the root path)
//! - repeated slashes collapse
//! - placeholder regex constraints (`{id:\d+}`) reduce to the bare name

use crate::error::{HikakuError, HikakuResult};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One piece of a path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathPart {
    /// Literal text.
    Literal(String),
    /// A named placeholder, stored without braces.
    Parameter(String),
}

/// The text between two slashes. Usually a single part, but templates like
/// `{name}.{ext}` mix several.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    /// Parts in order of appearance.
    pub parts: Vec<PathPart>,
}

impl PathSegment {
    /// Whether the segment is exactly one placeholder.
    pub fn is_parameter(&self) -> bool {
        matches!(self.parts.as_slice(), [PathPart::Parameter(_)])
    }

    fn render(&self, out: &mut String, anonymize: bool) {
        for part in &self.parts {
            match part {
                PathPart::Literal(text) => out.push_str(text),
                PathPart::Parameter(_) if anonymize => out.push_str("{}"),
                PathPart::Parameter(name) => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
            }
        }
    }
}

/// A parsed, canonical path template.
///
/// Equality, ordering and hashing use the canonical string, which
/// round-trips through [`PathTemplate::parse`] unchanged.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    segments: Vec<PathSegment>,
    canonical: String,
}

impl PathTemplate {
    /// Parses raw path text.
    ///
    /// `location` names the artifact the path came from and ends up in the
    /// `MalformedPath` error if braces are unbalanced, nested, or empty.
    pub fn parse(raw: &str, location: &str) -> HikakuResult<Self> {
        let malformed = || HikakuError::MalformedPath {
            path: raw.to_string(),
            location: location.to_string(),
        };

        let chars: Vec<char> = raw.trim().chars().collect();
        let mut segments = Vec::new();
        let mut parts: Vec<PathPart> = Vec::new();
        let mut literal = String::new();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '/' => {
                    flush_literal(&mut literal, &mut parts);
                    if !parts.is_empty() {
                        segments.push(PathSegment {
                            parts: std::mem::take(&mut parts),
                        });
                    }
                    i += 1;
                }
                '{' => {
                    flush_literal(&mut literal, &mut parts);
                    let (name, next) = parse_placeholder(&chars, i + 1).ok_or_else(malformed)?;
                    parts.push(PathPart::Parameter(name));
                    i = next;
                }
                '}' => return Err(malformed()),
                c => {
                    literal.push(c);
                    i += 1;
                }
            }
        }
        flush_literal(&mut literal, &mut parts);
        if !parts.is_empty() {
            segments.push(PathSegment { parts });
        }

        Ok(Self::from_segments(segments))
    }

    /// The root path `/`.
    pub fn root() -> Self {
        Self::from_segments(Vec::new())
    }

    fn from_segments(segments: Vec<PathSegment>) -> Self {
        let canonical = render(&segments, false);
        Self {
            segments,
            canonical,
        }
    }

    /// Appends `suffix` to this template (controller base path + handler path).
    pub fn join(&self, suffix: &PathTemplate) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(suffix.segments.iter().cloned());
        Self::from_segments(segments)
    }

    /// Segments in order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Placeholder names in order of appearance.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .flat_map(|s| s.parts.iter())
            .filter_map(|p| match p {
                PathPart::Parameter(name) => Some(name.as_str()),
                PathPart::Literal(_) => None,
            })
            .collect()
    }

    /// Whether the template declares a placeholder with this name.
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter_names().contains(&name)
    }

    /// Canonical form with every placeholder rendered as `{}`.
    ///
    /// Two templates with the same shape have the same segment structure and
    /// parameter count, differing at most in parameter names.
    pub fn shape(&self) -> String {
        render(&self.segments, true)
    }
}

fn flush_literal(literal: &mut String, parts: &mut Vec<PathPart>) {
    if !literal.is_empty() {
        parts.push(PathPart::Literal(std::mem::take(literal)));
    }
}

/// Reads a placeholder starting right after `{`. Returns the name and the
/// index just past the closing brace.
fn parse_placeholder(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut name = String::new();
    let mut i = start;

    loop {
        match chars.get(i)? {
            '}' => {
                i += 1;
                break;
            }
            ':' => {
                i = skip_constraint(chars, i + 1)?;
                break;
            }
            '{' | '/' => return None,
            c => name.push(*c),
        }
        i += 1;
    }

    let name = name.trim().to_string();
    if name.is_empty() {
        return None;
    }
    Some((name, i))
}

/// Skips a regex constraint, which may itself contain balanced braces
/// (`{id:\d{3}}`). Returns the index past the placeholder's closing brace.
fn skip_constraint(chars: &[char], start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = start;
    while depth > 0 {
        match chars.get(i)? {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    Some(i)
}

fn render(segments: &[PathSegment], anonymize: bool) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        segment.render(&mut out, anonymize);
    }
    out
}

impl PartialEq for PathTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for PathTemplate {}

impl PartialOrd for PathTemplate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathTemplate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl Hash for PathTemplate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl Serialize for PathTemplate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.canonical)
    }
}
