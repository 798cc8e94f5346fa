//! Route handlers

pub mod auth;
pub mod categories;
pub mod health;
pub mod pages;
pub mod tasks;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use tb_core::{Error, FieldError};

use crate::auth::{current_session, Session};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_errors: Option<Vec<FieldError>>,
}

pub(crate) type RouteError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn route_error(status: StatusCode, error: impl Into<String>) -> RouteError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            field_errors: None,
        }),
    )
}

pub(crate) fn unauthorized(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::UNAUTHORIZED, error)
}

pub(crate) fn not_found(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::NOT_FOUND, error)
}

pub(crate) fn validation_failed(errors: Vec<FieldError>) -> RouteError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "Validation failed".to_string(),
            field_errors: Some(errors),
        }),
    )
}

/// Map a core error onto the response taxonomy: missing ids become 404,
/// rejected drafts 400, name collisions 409, anything else a generic 500.
pub(crate) fn core_error(err: Error) -> RouteError {
    match err {
        Error::TaskNotFound(_) | Error::CategoryNotFound(_) => not_found(err.to_string()),
        Error::Validation(errors) => validation_failed(errors),
        Error::Conflict(message) => route_error(StatusCode::CONFLICT, message),
        other => {
            tracing::error!("storage failure: {other}");
            route_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Reject API calls without a live session.
pub(crate) async fn require_api_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Session, RouteError> {
    current_session(state, headers)
        .await
        .ok_or_else(|| unauthorized("Authentication required"))
}

/// Build a CSV download response.
pub(crate) fn csv_download(bytes: Vec<u8>, filename: &str) -> Response {
    let mut response = Response::new(Body::from(bytes));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=UTF-8"),
    );
    if let Ok(disposition) = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
    {
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, disposition);
    }
    response
}
