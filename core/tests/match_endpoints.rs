//! End-to-end comparisons of OpenAPI documents against route tables and actix sources.

use hikaku_core::comparison::FieldMismatch;
use hikaku_core::{
    media_types, ActixSourceConverter, EndpointConverter, Feature, Hikaku, HikakuConfig,
    HikakuError, HttpMethod, OpenApiConverter, PathParameterPolicy, PathTemplate, RouteTable,
    RouteTableConverter, Side,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::fs;

const TODO_SPEC: &str = r#"
openapi: 3.0.2
info:
  title: Todo API
  version: 1.0.0
paths:
  /todos:
    get:
      responses:
        '200':
          description: all todos
          content:
            application/json:
              schema: { type: array }
    post:
      requestBody:
        content:
          application/xml:
            schema: { $ref: '#/components/schemas/Todo' }
      responses:
        '201':
          description: created
          content:
            application/json: {}
  /todos/{id}:
    parameters:
      - name: id
        in: path
        required: true
    delete:
      responses:
        '204':
          description: deleted
components:
  schemas:
    Todo:
      type: object
"#;

const TODO_ROUTES: &str = r#"
implicit_head: false
implicit_options: false
controllers:
  - base_path: /todos
    response_body: true
    handlers:
      - path: ""
        methods: [GET]
      - path: ""
        methods: [POST]
        request_body: typed
      - path: /{id}
        methods: [DELETE]
        returns: unit
        path_variables:
          - binding: id
  - base_path: /tags
    response_body: true
    handlers:
      - methods: [GET]
"#;

fn path(raw: &str) -> PathTemplate {
    PathTemplate::parse(raw, "test").unwrap()
}

fn routes(yaml: &str) -> RouteTableConverter {
    RouteTableConverter::new("routes.yaml", RouteTable::from_str("routes.yaml", yaml).unwrap())
}

#[test]
fn test_todo_application_drift() {
    let specification = OpenApiConverter::from_str("openapi.yaml", TODO_SPEC);
    let implementation = routes(TODO_ROUTES);

    let result = Hikaku::new(&specification, &implementation)
        .match_endpoints()
        .unwrap();

    assert!(result.has_mismatches());
    assert!(result.only_in_specification.is_empty());

    let extra: Vec<String> = result
        .only_in_implementation
        .iter()
        .map(|e| e.to_string())
        .collect();
    assert_eq!(extra, vec!["GET /tags"]);

    assert_eq!(
        result.field_mismatches,
        vec![FieldMismatch {
            path: path("/todos"),
            http_method: HttpMethod::Post,
            field: Feature::Consumes,
            only_in_specification: vec!["application/xml".to_string()],
            only_in_implementation: vec!["application/json".to_string()],
        }]
    );
    assert_eq!(result.matched, 3);
}

#[test]
fn test_override_chain_and_wildcard_body() {
    let implementation = routes(
        r#"
implicit_head: false
implicit_options: false
controllers:
  - base_path: /notes
    consumes: [application/xml]
    response_body: true
    handlers:
      - methods: [PUT]
        consumes: [text/plain]
        request_body: typed
      - methods: [POST]
        request_body: typed
  - base_path: /raw
    response_body: true
    handlers:
      - methods: [POST]
        request_body: text
        returns: text
"#,
    );
    let endpoints = implementation.convert().unwrap();

    let put = endpoints.get(&path("/notes"), HttpMethod::Put).unwrap();
    assert_eq!(put.consumes, media_types(["text/plain"]));

    let post = endpoints.get(&path("/notes"), HttpMethod::Post).unwrap();
    assert_eq!(post.consumes, media_types(["application/xml"]));
    assert_eq!(post.produces, media_types(["application/json"]));

    let raw = endpoints.get(&path("/raw"), HttpMethod::Post).unwrap();
    assert_eq!(raw.consumes, media_types(["*/*"]));
    assert_eq!(raw.produces, media_types(["text/plain"]));
}

#[test]
fn test_conversion_is_deterministic() {
    let first = OpenApiConverter::from_str("openapi.yaml", TODO_SPEC)
        .convert()
        .unwrap();
    let second = OpenApiConverter::from_str("openapi.yaml", TODO_SPEC)
        .convert()
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    let a = routes(TODO_ROUTES).convert().unwrap();
    let b = routes(TODO_ROUTES).convert().unwrap();
    assert_eq!(format!("{:?}", a), format!("{:?}", b));
}

#[test]
fn test_parameter_name_policies() {
    let specification = OpenApiConverter::from_str(
        "openapi.yaml",
        r#"
openapi: 3.0.0
paths:
  /todos/{id}:
    delete: {}
"#,
    );
    let implementation = routes(
        r#"
implicit_head: false
implicit_options: false
controllers:
  - base_path: /todos
    handlers:
      - path: /{todoId}
        methods: [DELETE]
        path_variables:
          - binding: otherName
            name: todoId
"#,
    );

    let strict = Hikaku::new(&specification, &implementation)
        .match_endpoints()
        .unwrap();
    assert_eq!(strict.only_in_specification.len(), 1);
    assert_eq!(strict.only_in_implementation.len(), 1);

    let lenient = Hikaku::new(&specification, &implementation)
        .with_config(HikakuConfig {
            path_parameter_policy: PathParameterPolicy::Lenient,
            ..HikakuConfig::default()
        })
        .match_endpoints()
        .unwrap();
    assert!(lenient.only_in_specification.is_empty());
    assert!(lenient.only_in_implementation.is_empty());
    assert_eq!(lenient.field_mismatches.len(), 1);
    assert_eq!(lenient.field_mismatches[0].field, Feature::PathParameters);
}

#[test]
fn test_implicit_routes_can_be_ignored() {
    let specification = OpenApiConverter::from_str(
        "openapi.yaml",
        r#"
swagger: "2.0"
produces: [application/json]
paths:
  /todos:
    get:
      responses:
        '200':
          description: ok
          schema: { type: array }
"#,
    );
    let implementation = routes(
        r#"
controllers:
  - response_body: true
    handlers:
      - path: /todos
        methods: [GET]
      - path: /error
"#,
    );

    let noisy = Hikaku::new(&specification, &implementation)
        .match_endpoints()
        .unwrap();
    let extra: Vec<String> = noisy
        .only_in_implementation
        .iter()
        .map(|e| e.to_string())
        .collect();
    assert_eq!(extra, vec!["HEAD /todos", "OPTIONS /todos"]);

    let config = HikakuConfig {
        ignore_http_methods: BTreeSet::from([HttpMethod::Head, HttpMethod::Options]),
        ..HikakuConfig::default()
    };
    let quiet = Hikaku::new(&specification, &implementation)
        .with_config(config)
        .match_endpoints()
        .unwrap();
    assert!(!quiet.has_mismatches());
}

#[test]
fn test_duplicate_registration_names_side() {
    let specification = OpenApiConverter::from_str("openapi.yaml", TODO_SPEC);
    let implementation = routes(
        r#"
controllers:
  - response_body: true
    handlers:
      - path: /todos
        methods: [POST]
        request_body: typed
      - path: /todos/
        methods: [POST]
        request_body: text
"#,
    );

    match Hikaku::new(&specification, &implementation)
        .match_endpoints()
        .unwrap_err()
    {
        HikakuError::Conversion { side, cause, .. } => {
            assert_eq!(side, Side::Implementation);
            assert!(matches!(*cause, HikakuError::DuplicateRoute { .. }));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_malformed_specification_path_names_side() {
    let specification = OpenApiConverter::from_str(
        "openapi.yaml",
        "openapi: 3.0.0\npaths:\n  '/todos/{id':\n    get: {}\n",
    );
    let implementation = routes("controllers: []\n");

    let err = Hikaku::new(&specification, &implementation)
        .match_endpoints()
        .unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Failed to convert specification"));
    assert!(message.contains("Malformed path '/todos/{id'"));
}

#[test]
fn test_actix_sources_against_specification() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("todos.rs"),
        r#"
use actix_web::{delete, get, post, web, HttpResponse};

#[get("/todos")]
async fn list() -> web::Json<Vec<Todo>> { todo!() }

#[post("/todos")]
async fn create(todo: web::Json<Todo>) -> web::Json<Todo> { todo!() }

#[delete("/todos/{id:\\d+}")]
async fn remove(id: web::Path<u32>) -> HttpResponse { todo!() }
"#,
    )
    .unwrap();

    let specification = OpenApiConverter::from_str("openapi.yaml", TODO_SPEC);
    let implementation = ActixSourceConverter::new([dir.path()]);
    let result = Hikaku::new(&specification, &implementation)
        .match_endpoints()
        .unwrap();

    assert!(result.only_in_specification.is_empty());
    assert!(result.only_in_implementation.is_empty());

    let fields: Vec<(String, Feature)> = result
        .field_mismatches
        .iter()
        .map(|m| (format!("{} {}", m.http_method, m.path), m.field))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("POST /todos".to_string(), Feature::Consumes),
            ("DELETE /todos/{id}".to_string(), Feature::Produces),
        ]
    );
}
