//! # Media Type Policy
//!
//! Decides `consumes`/`produces` for one handler of a route table.
//!
//! Every special case is its own branch so that "declared nothing" never
//! gets confused with "framework default".

use crate::converters::routes::{Controller, Handler, RequestBody, ReturnKind, RouteDefaults};
use crate::endpoints::{resolve_media_types, MediaType, MediaTypeSet};

/// Which rule produced a media type set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// The handler has no request body, or writes no response body.
    NoBody,
    /// Declared at function or class level.
    Declared,
    /// Raw text or bytes request body without any declaration: `*/*`.
    RawBody,
    /// A plain text return value.
    TextReturn,
    /// A redirect carries no body.
    Redirect,
    /// Falls back to the table's global default.
    Default,
}

/// Request media types with the branch that decided them.
pub fn consumes(
    handler: &Handler,
    controller: &Controller,
    defaults: &RouteDefaults,
) -> (Branch, MediaTypeSet) {
    if handler.request_body == RequestBody::None {
        return (Branch::NoBody, MediaTypeSet::new());
    }

    let scopes = [handler.consumes.as_ref(), controller.consumes.as_ref()];
    if scopes.iter().any(Option::is_some) {
        return (Branch::Declared, resolve_media_types(&scopes));
    }

    match handler.request_body {
        RequestBody::Text | RequestBody::Bytes => {
            (Branch::RawBody, MediaTypeSet::from([MediaType::all()]))
        }
        _ => (Branch::Default, defaults.effective_consumes()),
    }
}

/// Response media types with the branch that decided them.
pub fn produces(
    handler: &Handler,
    controller: &Controller,
    defaults: &RouteDefaults,
) -> (Branch, MediaTypeSet) {
    let writes_body = handler.response_body.unwrap_or(controller.response_body);
    if !writes_body {
        return (Branch::NoBody, MediaTypeSet::new());
    }
    if handler.returns == ReturnKind::Unit && !handler.raw_response_writer {
        return (Branch::NoBody, MediaTypeSet::new());
    }

    let scopes = [handler.produces.as_ref(), controller.produces.as_ref()];
    if scopes.iter().any(Option::is_some) {
        return (Branch::Declared, resolve_media_types(&scopes));
    }

    match handler.returns {
        ReturnKind::Text => (Branch::TextReturn, MediaTypeSet::from([MediaType::text_plain()])),
        ReturnKind::Redirect => (Branch::Redirect, MediaTypeSet::new()),
        ReturnKind::Unit => (Branch::NoBody, MediaTypeSet::new()),
        ReturnKind::Typed => (Branch::Default, defaults.effective_produces()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::media_types;
    use pretty_assertions::assert_eq;

    fn rest_controller() -> Controller {
        Controller {
            response_body: true,
            ..Controller::default()
        }
    }

    fn typed_handler() -> Handler {
        Handler {
            request_body: RequestBody::Typed,
            returns: ReturnKind::Typed,
            ..Handler::default()
        }
    }

    #[test]
    fn test_function_level_wins_over_class_level() {
        let controller = Controller {
            consumes: Some(media_types(["application/xml"])),
            ..rest_controller()
        };
        let handler = Handler {
            consumes: Some(media_types(["text/plain"])),
            ..typed_handler()
        };
        let (branch, consumes) = consumes(&handler, &controller, &RouteDefaults::default());
        assert_eq!(branch, Branch::Declared);
        assert_eq!(consumes, media_types(["text/plain"]));
    }

    #[test]
    fn test_default_fallback_is_json() {
        let (branch, consumes_set) =
            consumes(&typed_handler(), &rest_controller(), &RouteDefaults::default());
        assert_eq!(branch, Branch::Default);
        assert_eq!(consumes_set, media_types(["application/json"]));

        let (_, produces_set) =
            produces(&typed_handler(), &rest_controller(), &RouteDefaults::default());
        assert_eq!(produces_set, media_types(["application/json"]));
    }

    #[test]
    fn test_raw_text_body_consumes_anything() {
        let handler = Handler {
            request_body: RequestBody::Text,
            ..typed_handler()
        };
        let (branch, consumes) = consumes(&handler, &rest_controller(), &RouteDefaults::default());
        assert_eq!(branch, Branch::RawBody);
        assert_eq!(consumes, media_types(["*/*"]));
    }

    #[test]
    fn test_raw_text_body_respects_declaration() {
        let handler = Handler {
            request_body: RequestBody::Text,
            consumes: Some(media_types(["text/plain"])),
            ..typed_handler()
        };
        let (_, consumes) = consumes(&handler, &rest_controller(), &RouteDefaults::default());
        assert_eq!(consumes, media_types(["text/plain"]));
    }

    #[test]
    fn test_no_request_body() {
        let handler = Handler {
            consumes: Some(media_types(["application/json"])),
            ..Handler::default()
        };
        let (branch, consumes) = consumes(&handler, &rest_controller(), &RouteDefaults::default());
        assert_eq!(branch, Branch::NoBody);
        assert!(consumes.is_empty());
    }

    #[test]
    fn test_without_response_body_produces_nothing() {
        let (branch, produces_set) =
            produces(&typed_handler(), &Controller::default(), &RouteDefaults::default());
        assert_eq!(branch, Branch::NoBody);
        assert!(produces_set.is_empty());

        let handler = Handler {
            response_body: Some(true),
            ..typed_handler()
        };
        let (_, produces_set) =
            produces(&handler, &Controller::default(), &RouteDefaults::default());
        assert_eq!(produces_set, media_types(["application/json"]));
    }

    #[test]
    fn test_unit_return() {
        let handler = Handler {
            returns: ReturnKind::Unit,
            produces: Some(media_types(["application/json"])),
            ..typed_handler()
        };
        let (branch, produces_set) =
            produces(&handler, &rest_controller(), &RouteDefaults::default());
        assert_eq!(branch, Branch::NoBody);
        assert!(produces_set.is_empty());

        let writer = Handler {
            raw_response_writer: true,
            ..handler
        };
        let (branch, produces_set) =
            produces(&writer, &rest_controller(), &RouteDefaults::default());
        assert_eq!(branch, Branch::Declared);
        assert_eq!(produces_set, media_types(["application/json"]));
    }

    #[test]
    fn test_text_and_redirect_returns() {
        let text = Handler {
            returns: ReturnKind::Text,
            ..typed_handler()
        };
        let (_, produces_set) = produces(&text, &rest_controller(), &RouteDefaults::default());
        assert_eq!(produces_set, media_types(["text/plain"]));

        let redirect = Handler {
            returns: ReturnKind::Redirect,
            ..typed_handler()
        };
        let (branch, produces_set) =
            produces(&redirect, &rest_controller(), &RouteDefaults::default());
        assert_eq!(branch, Branch::Redirect);
        assert!(produces_set.is_empty());
    }

    #[test]
    fn test_raw_body_ignores_global_default() {
        let defaults = RouteDefaults {
            consumes: Some(media_types(["application/xml"])),
            produces: None,
        };
        let handler = Handler {
            request_body: RequestBody::Bytes,
            ..typed_handler()
        };
        let (branch, consumes_set) = consumes(&handler, &rest_controller(), &defaults);
        assert_eq!(branch, Branch::RawBody);
        assert_eq!(consumes_set, media_types(["*/*"]));
    }

    #[test]
    fn test_class_level_produces() {
        let controller = Controller {
            produces: Some(media_types(["application/xml", "text/plain"])),
            ..rest_controller()
        };
        let (_, produces_set) =
            produces(&typed_handler(), &controller, &RouteDefaults::default());
        assert_eq!(produces_set, media_types(["application/xml", "text/plain"]));
    }

    #[test]
    fn test_global_defaults_override_builtin() {
        let defaults = RouteDefaults {
            consumes: Some(media_types(["application/json;charset=UTF-8"])),
            produces: Some(media_types(["application/hal+json"])),
        };
        let (branch, consumes_set) = consumes(&typed_handler(), &rest_controller(), &defaults);
        assert_eq!(branch, Branch::Default);
        assert_eq!(consumes_set, media_types(["application/json;charset=UTF-8"]));

        let (branch, produces_set) = produces(&typed_handler(), &rest_controller(), &defaults);
        assert_eq!(branch, Branch::Default);
        assert_eq!(produces_set, media_types(["application/hal+json"]));
    }
}
