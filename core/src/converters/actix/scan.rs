//! # Source Scanning
//!
//! Finds actix-web route attributes in Rust source with `ra_ap_syntax` and
//! turns each annotated function into a route table [`Handler`].

use crate::converters::actix::classify::{BodyExtractor, TypeClassifier};
use crate::converters::routes::{Controller, Handler};
use crate::endpoints::{HttpMethod, MediaType, MediaTypeSet, PathTemplate};
use crate::error::{HikakuError, HikakuResult};
use ra_ap_edition::Edition;
use ra_ap_syntax::ast::{self, HasAttrs, HasName};
use ra_ap_syntax::{AstNode, SourceFile};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::debug;

/// A route attribute found on a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAttribute {
    /// Path literal.
    pub path: String,
    /// Methods registered by the attribute.
    pub methods: Vec<HttpMethod>,
}

/// Scans one source file. Handlers are grouped into one controller per
/// `#[scope]` prefix, in prefix order.
pub fn scan_source(
    code: &str,
    file: &str,
    classifier: &TypeClassifier,
) -> HikakuResult<Vec<Controller>> {
    let parse = SourceFile::parse(code, Edition::Edition2021);
    let errors = parse.errors();
    if let Some(error) = errors.first() {
        return Err(HikakuError::unsupported(
            file,
            format!("Rust syntax error: {}", error),
        ));
    }

    let mut scopes: BTreeMap<String, Controller> = BTreeMap::new();

    for function in parse.tree().syntax().descendants().filter_map(ast::Fn::cast) {
        let name = function
            .name()
            .map(|n| n.text().to_string())
            .unwrap_or_default();
        let location = format!("{} fn {}", file, name);

        let routes = route_attributes(&function, file, &location)?;
        if routes.is_empty() {
            continue;
        }

        let base_path = scope_prefix(&function, file, &location)?;
        let template = handler_template(&function, classifier);

        let controller = scopes.entry(base_path.clone()).or_insert_with(|| Controller {
            base_path: Some(base_path.clone()),
            response_body: true,
            ..Controller::default()
        });

        for route in routes {
            PathTemplate::parse(&route.path, &location)?;
            debug!(
                location = %location,
                path = %route.path,
                methods = ?route.methods,
                "found actix route"
            );
            controller.handlers.push(Handler {
                path: route.path,
                methods: route.methods,
                ..template.clone()
            });
        }
    }

    Ok(scopes.into_values().collect())
}

/// Body and return classification shared by every route on the function.
fn handler_template(function: &ast::Fn, classifier: &TypeClassifier) -> Handler {
    let body = function
        .param_list()
        .into_iter()
        .flat_map(|list| list.params())
        .filter_map(|param| param.ty())
        .find_map(|ty| classifier.body(&ty.syntax().text().to_string()));

    let return_type = function
        .ret_type()
        .and_then(|ret| ret.ty())
        .map(|ty| ty.syntax().text().to_string());

    let consumes = match body {
        Some(BodyExtractor::Form) => Some(MediaTypeSet::from([MediaType::new(
            MediaType::FORM_URLENCODED_VALUE,
        )])),
        _ => None,
    };

    Handler {
        consumes,
        request_body: body.map(BodyExtractor::request_body).unwrap_or_default(),
        returns: classifier.returns(return_type.as_deref()),
        ..Handler::default()
    }
}

/// Attribute name without its module path (`actix_web::get` -> `get`) and
/// the raw argument tokens.
fn attribute_name(attr: &ast::Attr) -> Option<(String, String)> {
    let meta = attr.meta()?;
    let path = meta.path()?.to_string();
    let name = path.rsplit("::").next().unwrap_or_default().trim().to_string();
    let args = meta.token_tree().map(|tt| tt.to_string()).unwrap_or_default();
    Some((name, args))
}

fn shorthand_method(name: &str) -> Option<HttpMethod> {
    match name {
        "get" => Some(HttpMethod::Get),
        "post" => Some(HttpMethod::Post),
        "put" => Some(HttpMethod::Put),
        "patch" => Some(HttpMethod::Patch),
        "delete" => Some(HttpMethod::Delete),
        "head" => Some(HttpMethod::Head),
        "options" => Some(HttpMethod::Options),
        "trace" => Some(HttpMethod::Trace),
        _ => None,
    }
}

/// Route attributes on `function`, in source order.
pub fn route_attributes(
    function: &ast::Fn,
    file: &str,
    location: &str,
) -> HikakuResult<Vec<RouteAttribute>> {
    let mut routes = Vec::new();

    for (name, args) in function.attrs().filter_map(|a| attribute_name(&a)) {
        let methods = if let Some(method) = shorthand_method(&name) {
            vec![method]
        } else if name == "route" {
            route_methods(&args, file, location)?
        } else {
            continue;
        };

        let path = path_literal(&args).ok_or_else(|| {
            HikakuError::unsupported(
                file,
                format!("#[{}] without a string literal path on {}", name, location),
            )
        })?;

        routes.push(RouteAttribute { path, methods });
    }

    Ok(routes)
}

/// First argument of an attribute, when it is a string literal.
fn path_literal(args: &str) -> Option<String> {
    static PATH_RE: OnceLock<Regex> = OnceLock::new();
    let path_re = PATH_RE.get_or_init(|| {
        Regex::new(r##"^\(\s*(?:"((?:[^"\\]|\\.)*)"|r"([^"]*)"|r#"(.*?)"#)"##)
            .expect("Invalid regex")
    });

    let caps = path_re.captures(args.trim())?;
    if let Some(escaped) = caps.get(1) {
        return Some(unescape(escaped.as_str()));
    }
    caps.get(2)
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().to_string())
}

fn unescape(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// `method = "..."` arguments of `#[route]`.
fn route_methods(args: &str, file: &str, location: &str) -> HikakuResult<Vec<HttpMethod>> {
    static METHOD_RE: OnceLock<Regex> = OnceLock::new();
    let method_re = METHOD_RE
        .get_or_init(|| Regex::new(r#"\bmethod\s*=\s*"([^"]*)""#).expect("Invalid regex"));

    let mut methods = Vec::new();
    for caps in method_re.captures_iter(args) {
        let raw = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let method = raw.parse::<HttpMethod>().map_err(|e| {
            HikakuError::unsupported(file, format!("{} on {}", e, location))
        })?;
        if !methods.contains(&method) {
            methods.push(method);
        }
    }

    if methods.is_empty() {
        return Err(HikakuError::unsupported(
            file,
            format!("#[route] without any method on {}", location),
        ));
    }
    Ok(methods)
}

/// Joined `#[scope("..")]` prefixes of the enclosing modules, outermost first.
fn scope_prefix(function: &ast::Fn, file: &str, location: &str) -> HikakuResult<String> {
    let modules: Vec<ast::Module> = function
        .syntax()
        .ancestors()
        .filter_map(ast::Module::cast)
        .collect();

    let mut prefix = PathTemplate::root();
    for module in modules.iter().rev() {
        for (name, args) in module.attrs().filter_map(|a| attribute_name(&a)) {
            if name != "scope" {
                continue;
            }
            let raw = path_literal(&args).ok_or_else(|| {
                HikakuError::unsupported(
                    file,
                    format!("#[scope] without a string literal path around {}", location),
                )
            })?;
            prefix = prefix.join(&PathTemplate::parse(&raw, location)?);
        }
    }
    Ok(prefix.to_string())
}
