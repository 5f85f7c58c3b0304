//! OpenAPI document and Swagger UI page.
//!
//! The document is derived from [`ROUTES`], which is built from the same path constants the
//! router registers, and from `schemars` schemas of the wire types. It is rendered once and
//! cached for the process lifetime.

use crate::api::{METRICS_PATH, MetricsResponse, OPENAPI_PATH, STUDENT_PATH, STUDENTS_PATH};
use crate::store::{NewStudent, Student, StudentPatch};
use axum::{Json, response::Html};
use schemars::r#gen::{SchemaGenerator, SchemaSettings};
use serde_json::{Map, Value, json};
use std::sync::OnceLock;

/// Body shapes referenced by the documented routes.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Payload {
    Student,
    StudentList,
    NewStudent,
    StudentPatch,
    Metrics,
    PlainText,
}

/// Documented response for a route.
#[derive(Debug)]
pub(crate) struct ResponseDoc {
    pub status: u16,
    pub description: &'static str,
    pub body: Option<Payload>,
}

/// Documentation entry for a single method/path pair.
#[derive(Debug)]
pub(crate) struct RouteDoc {
    pub method: &'static str,
    pub path: &'static str,
    pub summary: &'static str,
    pub request: Option<Payload>,
    pub responses: &'static [ResponseDoc],
}

const NOT_FOUND: ResponseDoc = ResponseDoc {
    status: 404,
    description: "Student not found",
    body: Some(Payload::PlainText),
};

/// Every documented route, in the order it appears in the generated document.
pub(crate) const ROUTES: &[RouteDoc] = &[
    RouteDoc {
        method: "get",
        path: STUDENTS_PATH,
        summary: "List all students in insertion order",
        request: None,
        responses: &[ResponseDoc {
            status: 200,
            description: "All students",
            body: Some(Payload::StudentList),
        }],
    },
    RouteDoc {
        method: "post",
        path: STUDENTS_PATH,
        summary: "Create a student (a numeric key is assigned when omitted)",
        request: Some(Payload::NewStudent),
        responses: &[
            ResponseDoc {
                status: 201,
                description: "Student created",
                body: Some(Payload::Student),
            },
            ResponseDoc {
                status: 409,
                description: "A student with this key already exists",
                body: Some(Payload::PlainText),
            },
        ],
    },
    RouteDoc {
        method: "get",
        path: STUDENT_PATH,
        summary: "Fetch a student by key",
        request: None,
        responses: &[
            ResponseDoc {
                status: 200,
                description: "Student data",
                body: Some(Payload::Student),
            },
            NOT_FOUND,
        ],
    },
    RouteDoc {
        method: "put",
        path: STUDENT_PATH,
        summary: "Partially update a student; absent fields keep their values",
        request: Some(Payload::StudentPatch),
        responses: &[
            ResponseDoc {
                status: 200,
                description: "Student updated",
                body: Some(Payload::Student),
            },
            ResponseDoc {
                status: 400,
                description: "Payload key differs from the addressed student",
                body: Some(Payload::PlainText),
            },
            NOT_FOUND,
        ],
    },
    RouteDoc {
        method: "delete",
        path: STUDENT_PATH,
        summary: "Delete a student",
        request: None,
        responses: &[
            ResponseDoc {
                status: 204,
                description: "Student deleted",
                body: None,
            },
            NOT_FOUND,
        ],
    },
    RouteDoc {
        method: "get",
        path: METRICS_PATH,
        summary: "Store activity counters",
        request: None,
        responses: &[ResponseDoc {
            status: 200,
            description: "Current counters and record count",
            body: Some(Payload::Metrics),
        }],
    },
];

static OPENAPI: OnceLock<Value> = OnceLock::new();

/// Return the cached OpenAPI document.
pub fn openapi_document() -> &'static Value {
    OPENAPI.get_or_init(build_openapi)
}

/// `GET /api-docs/openapi.json`
pub(crate) async fn openapi_json() -> Json<Value> {
    Json(openapi_document().clone())
}

/// `GET /api-docs`
pub(crate) async fn swagger_ui() -> Html<String> {
    Html(SWAGGER_UI_TEMPLATE.replace("{{spec_url}}", OPENAPI_PATH))
}

fn build_openapi() -> Value {
    let mut generator = SchemaSettings::openapi3().into_generator();
    let mut paths = Map::new();

    for route in ROUTES {
        let operation = operation_object(route, &mut generator);
        let entry = paths
            .entry(openapi_path(route.path))
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(methods) = entry {
            methods.insert(route.method.to_string(), operation);
        }
    }

    let schemas: Map<String, Value> = generator
        .take_definitions()
        .into_iter()
        .map(|(name, schema)| {
            let value = serde_json::to_value(schema).unwrap_or(Value::Null);
            (name, value)
        })
        .collect();

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Rusty Roster student API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        },
        "paths": paths,
        "components": { "schemas": schemas },
    })
}

fn operation_object(route: &RouteDoc, generator: &mut SchemaGenerator) -> Value {
    let mut operation = Map::new();
    operation.insert("summary".into(), Value::String(route.summary.into()));

    if route.path.contains(":key") {
        operation.insert(
            "parameters".into(),
            json!([{
                "in": "path",
                "name": "key",
                "required": true,
                "description": "Student key (surrogate id or matriculation)",
                "schema": { "type": "string" },
            }]),
        );
    }

    if let Some(payload) = route.request {
        operation.insert(
            "requestBody".into(),
            json!({
                "required": true,
                "content": content_for(payload, generator),
            }),
        );
    }

    let mut responses = Map::new();
    for response in route.responses {
        let mut object = Map::new();
        object.insert(
            "description".into(),
            Value::String(response.description.into()),
        );
        if let Some(payload) = response.body {
            object.insert("content".into(), content_for(payload, generator));
        }
        responses.insert(response.status.to_string(), Value::Object(object));
    }
    operation.insert("responses".into(), Value::Object(responses));

    Value::Object(operation)
}

fn content_for(payload: Payload, generator: &mut SchemaGenerator) -> Value {
    let (media_type, schema) = match payload {
        Payload::Student => ("application/json", generator.subschema_for::<Student>()),
        Payload::StudentList => ("application/json", generator.subschema_for::<Vec<Student>>()),
        Payload::NewStudent => ("application/json", generator.subschema_for::<NewStudent>()),
        Payload::StudentPatch => ("application/json", generator.subschema_for::<StudentPatch>()),
        Payload::Metrics => (
            "application/json",
            generator.subschema_for::<MetricsResponse>(),
        ),
        Payload::PlainText => ("text/plain", generator.subschema_for::<String>()),
    };
    let schema = serde_json::to_value(schema).unwrap_or(Value::Null);
    let mut content = Map::new();
    content.insert(media_type.to_string(), json!({ "schema": schema }));
    Value::Object(content)
}

/// Convert an axum route pattern (`/students/:key`) to OpenAPI form (`/students/{key}`).
fn openapi_path(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => format!("{{{name}}}"),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

const SWAGGER_UI_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <title>Rusty Roster API</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
  </head>
  <body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
    <script>
      window.onload = () => {
        window.ui = SwaggerUIBundle({ url: "{{spec_url}}", dom_id: "#swagger-ui" });
      };
    </script>
  </body>
</html>
"##;
