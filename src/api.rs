//! HTTP surface for Rusty Roster.
//!
//! This module exposes a compact Axum router over the record store:
//!
//! - `GET /students` – List every student in insertion order.
//! - `POST /students` – Create a student. Returns `201` with the stored record, or `409` when the
//!   key is already taken. A numeric key is assigned when the payload omits one.
//! - `GET /students/:key` – Fetch one student, or `404 not found`.
//! - `PUT /students/:key` – Partially update a student. Only fields present in the body change;
//!   a body key that differs from the path key is rejected with `400`.
//! - `DELETE /students/:key` – Remove a student (`204`), or `404 not found`.
//! - `GET /metrics` – Store activity counters and the current record count.
//! - `GET /api-docs` and `GET /api-docs/openapi.json` – Swagger UI and the OpenAPI document.
//!
//! Keys in paths are normalized the same way as keys in bodies, so `/students/885112` addresses a
//! record created with either `"key": 885112` or `"key": "885112"`.

use crate::docs;
use crate::store::{NewStudent, StoreError, Student, StudentApi, StudentKey, StudentPatch};
use crate::metrics::MetricsSnapshot;
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use schemars::JsonSchema;
use serde::Serialize;
use std::path::Path as FsPath;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Collection route for students.
pub const STUDENTS_PATH: &str = "/students";
/// Item route for a single student addressed by key.
pub const STUDENT_PATH: &str = "/students/:key";
/// Store metrics route.
pub const METRICS_PATH: &str = "/metrics";
/// Swagger UI route.
pub const DOCS_PATH: &str = "/api-docs";
/// OpenAPI document route.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Build the HTTP router exposing the student API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: StudentApi + 'static,
{
    Router::new()
        .route(
            STUDENTS_PATH,
            get(list_students::<S>).post(create_student::<S>),
        )
        .route(
            STUDENT_PATH,
            get(get_student::<S>)
                .put(update_student::<S>)
                .delete(delete_student::<S>),
        )
        .route(METRICS_PATH, get(get_metrics::<S>))
        .route(DOCS_PATH, get(docs::swagger_ui))
        .route(OPENAPI_PATH, get(docs::openapi_json))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serve files from `dir` for any request no API route matched.
pub fn with_static_assets(router: Router, dir: &FsPath) -> Router {
    router.fallback_service(ServeDir::new(dir))
}

/// List every student.
async fn list_students<S>(State(service): State<Arc<S>>) -> Json<Vec<Student>>
where
    S: StudentApi,
{
    Json(service.list_students().await)
}

/// Fetch a single student by key.
async fn get_student<S>(
    State(service): State<Arc<S>>,
    Path(raw_key): Path<String>,
) -> Result<Json<Student>, AppError>
where
    S: StudentApi,
{
    let key = path_key(&raw_key)?;
    Ok(Json(service.get_student(&key).await?))
}

/// Create a student from the request body.
async fn create_student<S>(
    State(service): State<Arc<S>>,
    payload: Result<Json<NewStudent>, JsonRejection>,
) -> Result<(StatusCode, Json<Student>), AppError>
where
    S: StudentApi,
{
    let Json(new_student) = payload?;
    let student = service.create_student(new_student).await?;
    tracing::info!(key = %student.key, "Create request completed");
    Ok((StatusCode::CREATED, Json(student)))
}

/// Merge a partial update into an existing student.
async fn update_student<S>(
    State(service): State<Arc<S>>,
    Path(raw_key): Path<String>,
    payload: Result<Json<StudentPatch>, JsonRejection>,
) -> Result<Json<Student>, AppError>
where
    S: StudentApi,
{
    let key = path_key(&raw_key)?;
    let Json(patch) = payload?;
    Ok(Json(service.update_student(&key, patch).await?))
}

/// Delete a student.
async fn delete_student<S>(
    State(service): State<Arc<S>>,
    Path(raw_key): Path<String>,
) -> Result<StatusCode, AppError>
where
    S: StudentApi,
{
    let key = path_key(&raw_key)?;
    service.delete_student(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Response body for `GET /metrics`.
#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetricsResponse {
    /// Number of students currently stored.
    students: usize,
    #[serde(flatten)]
    counters: MetricsSnapshot,
}

/// Return store counters alongside the current record count.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsResponse>
where
    S: StudentApi,
{
    Json(MetricsResponse {
        students: service.list_students().await.len(),
        counters: service.metrics_snapshot(),
    })
}

fn path_key(raw: &str) -> Result<StudentKey, AppError> {
    StudentKey::parse(raw).map_err(|_| AppError::UnknownKey)
}

enum AppError {
    Store(StoreError),
    MalformedInput(JsonRejection),
    UnknownKey,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Store(StoreError::NotFound(_)) | Self::UnknownKey => {
                (StatusCode::NOT_FOUND, "not found").into_response()
            }
            Self::Store(err @ StoreError::DuplicateKey(_)) => {
                (StatusCode::CONFLICT, err.to_string()).into_response()
            }
            Self::Store(err @ StoreError::KeyMismatch { .. }) => {
                (StatusCode::BAD_REQUEST, err.to_string()).into_response()
            }
            Self::MalformedInput(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected malformed payload");
                (rejection.status(), rejection.body_text()).into_response()
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(inner: StoreError) -> Self {
        Self::Store(inner)
    }
}

impl From<JsonRejection> for AppError {
    fn from(inner: JsonRejection) -> Self {
        Self::MalformedInput(inner)
    }
}
