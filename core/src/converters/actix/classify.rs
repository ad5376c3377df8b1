//! # Type Classification
//!
//! Maps the spelled-out argument and return types of a handler to the body
//! and return kinds of the route table. The recognized names are plain data
//! handed in at construction, so applications with their own extractor
//! wrappers can register them.

use crate::converters::routes::{RequestBody, ReturnKind};
use std::collections::BTreeSet;

/// What a request-body extractor implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyExtractor {
    /// `Json<T>`: typed body with the default media type.
    Json,
    /// `Form<T>`: typed body declared as url-encoded.
    Form,
    /// `String`: raw text.
    Text,
    /// `Bytes`: raw bytes.
    Bytes,
}

impl BodyExtractor {
    /// The route table's view of this extractor.
    pub fn request_body(self) -> RequestBody {
        match self {
            BodyExtractor::Json | BodyExtractor::Form => RequestBody::Typed,
            BodyExtractor::Text => RequestBody::Text,
            BodyExtractor::Bytes => RequestBody::Bytes,
        }
    }
}

/// Recognized type names, compared by their last path segment.
#[derive(Debug, Clone)]
pub struct TypeClassifier {
    json_bodies: BTreeSet<String>,
    form_bodies: BTreeSet<String>,
    text_bodies: BTreeSet<String>,
    byte_bodies: BTreeSet<String>,
    text_returns: BTreeSet<String>,
    redirect_returns: BTreeSet<String>,
    wrappers: BTreeSet<String>,
}

fn names(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for TypeClassifier {
    fn default() -> Self {
        Self {
            json_bodies: names(&["Json"]),
            form_bodies: names(&["Form"]),
            text_bodies: names(&["String"]),
            byte_bodies: names(&["Bytes", "BytesMut"]),
            text_returns: names(&["String", "str"]),
            redirect_returns: names(&["Redirect"]),
            wrappers: names(&["Result"]),
        }
    }
}

impl TypeClassifier {
    /// Registers an additional JSON body extractor.
    pub fn with_json_body(mut self, name: &str) -> Self {
        self.json_bodies.insert(name.to_string());
        self
    }

    /// Registers an additional form body extractor.
    pub fn with_form_body(mut self, name: &str) -> Self {
        self.form_bodies.insert(name.to_string());
        self
    }

    /// Registers an additional redirect return type.
    pub fn with_redirect_return(mut self, name: &str) -> Self {
        self.redirect_returns.insert(name.to_string());
        self
    }

    /// Registers a wrapper (like `Result`) whose first type argument is the
    /// actual return type.
    pub fn with_wrapper(mut self, name: &str) -> Self {
        self.wrappers.insert(name.to_string());
        self
    }

    /// Classifies one argument type.
    pub fn body(&self, ty: &str) -> Option<BodyExtractor> {
        let name = base_name(ty);
        if self.json_bodies.contains(name) {
            Some(BodyExtractor::Json)
        } else if self.form_bodies.contains(name) {
            Some(BodyExtractor::Form)
        } else if self.text_bodies.contains(name) {
            Some(BodyExtractor::Text)
        } else if self.byte_bodies.contains(name) {
            Some(BodyExtractor::Bytes)
        } else {
            None
        }
    }

    /// Classifies a return type; `None` is a missing return type.
    pub fn returns(&self, ty: Option<&str>) -> ReturnKind {
        let Some(ty) = ty else {
            return ReturnKind::Unit;
        };
        let ty = ty.trim();
        if ty.chars().all(|c| c == '(' || c == ')' || c.is_whitespace()) {
            return ReturnKind::Unit;
        }

        let name = base_name(ty);
        if self.wrappers.contains(name) {
            if let Some(inner) = first_type_argument(ty) {
                return self.returns(Some(inner));
            }
        }
        if self.text_returns.contains(name) {
            ReturnKind::Text
        } else if self.redirect_returns.contains(name) {
            ReturnKind::Redirect
        } else {
            ReturnKind::Typed
        }
    }
}

/// `&'static actix_web::web::Json<T>` -> `Json`
fn base_name(ty: &str) -> &str {
    let mut ty = ty.trim();
    if let Some(rest) = ty.strip_prefix('&') {
        ty = rest.trim_start();
        if ty.starts_with('\'') {
            ty = ty
                .split_once(char::is_whitespace)
                .map(|(_, rest)| rest)
                .unwrap_or_default()
                .trim_start();
        }
        ty = ty.strip_prefix("mut ").unwrap_or(ty).trim_start();
    }
    let without_generics = ty.split('<').next().unwrap_or_default();
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or_default()
        .trim()
}

/// `Result<String, Error>` -> `String`
fn first_type_argument(ty: &str) -> Option<&str> {
    let open = ty.find('<')?;
    let close = ty.rfind('>')?;
    let inner = ty.get(open + 1..close)?;

    let mut depth = 0usize;
    for (i, c) in inner.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return Some(inner[..i].trim()),
            _ => {}
        }
    }
    Some(inner.trim())
}
