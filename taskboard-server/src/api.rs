//! HTTP surface of the development server.
//!
//! Serves the slice of the PostgREST interface the client uses:
//!
//! | Method  | Path             | Notes                                          |
//! |---------|------------------|------------------------------------------------|
//! | `GET`   | `/rest/v1/tasks` | `order=created_at.desc` (default) or `.asc`    |
//! | `POST`  | `/rest/v1/tasks` | `201`; object or array depending on `Accept`   |
//! | `PATCH` | `/rest/v1/tasks` | `id=eq.<uuid>` filter required; `204`          |
//!
//! Every failure is answered with an [`ApiErrorBody`].

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use taskboard_proto::rest::{
    API_KEY_HEADER, ApiErrorBody, CHECK_VIOLATION, PREFER_MINIMAL, StatusPatch, parse_eq_filter,
    tasks_path,
};
use taskboard_proto::task::NewTask;

use crate::store::{CheckViolation, Order, TaskTable};

/// Default request body limit in bytes (64 KB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 64 * 1024;

/// Shared server state.
#[derive(Debug, Default)]
pub struct ServerState {
    /// The `tasks` table.
    pub table: TaskTable,
    /// Key clients must present, if any.
    api_key: Option<String>,
}

impl ServerState {
    /// Creates state over `table`. With `api_key` set, every request must
    /// carry it in the `apikey` header or as a bearer token.
    #[must_use]
    pub const fn new(table: TaskTable, api_key: Option<String>) -> Self {
        Self { table, api_key }
    }

    fn accepts(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = self.api_key.as_deref() else {
            return true;
        };
        let from_apikey = headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());
        let from_bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        from_apikey == Some(expected) || from_bearer == Some(expected)
    }
}

/// Request failures, rendered as PostgREST-style JSON errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or wrong API key.
    #[error("Invalid API key")]
    Unauthorized,

    /// Malformed query parameters.
    #[error("{0}")]
    BadQuery(String),

    /// Body is not valid JSON for the endpoint.
    #[error("{0}")]
    BadBody(String),

    /// The row violates a table constraint.
    #[error(transparent)]
    Check(#[from] CheckViolation),
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadQuery(_) | Self::BadBody(_) | Self::Check(_) => StatusCode::BAD_REQUEST,
        }
    }

    const fn code(&self) -> Option<&'static str> {
        match self {
            Self::Unauthorized => None,
            Self::BadQuery(_) => Some("PGRST100"),
            Self::BadBody(_) => Some("PGRST102"),
            Self::Check(_) => Some(CHECK_VIOLATION),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let body = match self.code() {
            Some(code) => ApiErrorBody::new(code, message),
            None => ApiErrorBody {
                message,
                ..ApiErrorBody::default()
            },
        };
        (self.status(), Json(body)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    order: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PatchParams {
    id: Option<String>,
}

/// Builds the router for `state`.
pub fn router(state: Arc<ServerState>, max_body_size: usize) -> Router {
    Router::new()
        .route(
            &tasks_path(),
            axum::routing::get(list_tasks)
                .post(create_task)
                .patch(update_task),
        )
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_api_key,
        ))
        .layer(DefaultBodyLimit::max(max_body_size))
        .with_state(state)
}

async fn require_api_key(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.accepts(request.headers()) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(uri = %request.uri(), "rejected request with invalid API key");
        Err(ApiError::Unauthorized)
    }
}

async fn list_tasks(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let order = match params.order.as_deref() {
        None => Order::default(),
        Some(value) => Order::parse(value)
            .ok_or_else(|| ApiError::BadQuery(format!("unsupported order \"{value}\"")))?,
    };
    let tasks = state.table.list(order).await;
    tracing::debug!(count = tasks.len(), ?order, "listed tasks");
    Ok(Json(tasks).into_response())
}

async fn create_task(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let new: NewTask =
        serde_json::from_slice(&body).map_err(|e| ApiError::BadBody(e.to_string()))?;
    let task = state.table.insert(new).await?;
    tracing::info!(task_id = %task.id, status = %task.status, "created task");

    if header_contains(&headers, "prefer", PREFER_MINIMAL) {
        return Ok(StatusCode::CREATED.into_response());
    }
    if header_contains(&headers, header::ACCEPT.as_str(), "vnd.pgrst.object") {
        Ok((StatusCode::CREATED, Json(task)).into_response())
    } else {
        Ok((StatusCode::CREATED, Json(vec![task])).into_response())
    }
}

async fn update_task(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<PatchParams>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let filter = params
        .id
        .ok_or_else(|| ApiError::BadQuery("an id=eq.<uuid> filter is required".to_string()))?;
    let id = parse_eq_filter(&filter)
        .ok_or_else(|| ApiError::BadQuery(format!("invalid id filter \"{filter}\"")))?;
    let patch: StatusPatch =
        serde_json::from_slice(&body).map_err(|e| ApiError::BadBody(e.to_string()))?;

    let affected = state.table.update_status(&id, patch.status).await;
    tracing::info!(task_id = %id, status = %patch.status, affected, "updated task status");
    Ok(StatusCode::NO_CONTENT)
}

fn header_contains(headers: &HeaderMap, name: &str, needle: &str) -> bool {
    headers
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains(needle))
}
