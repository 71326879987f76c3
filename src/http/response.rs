//! Response construction.
//!
//! # Responsibilities
//! - Serialize result entities to JSON exactly once
//! - Attach `ETag` / `Last-Modified` and answer 304 when the client is current
//! - Map request errors to HTTP status codes
//!
//! # Design Decisions
//! - The ETag is computed over the same bytes that are sent as the body
//! - Error bodies are JSON: `{"error": "..."}`
//! - 304 responses carry the validators but no body

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::cache::{ConditionalRequest, Freshness, Validators};
use crate::error::ResolveError;
use crate::observability::metrics;

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Resolve(ResolveError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Resolve(ResolveError::Conflict) => StatusCode::FORBIDDEN,
            ApiError::Resolve(ResolveError::Malformed(_)) => StatusCode::BAD_REQUEST,
            ApiError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::info!(status = %status, error = %self, "Request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Answer with `entity`, or with 304 if the client's copy is current.
pub fn conditional_response<T: Serialize + ?Sized>(
    endpoint: &'static str,
    entity: &T,
    last_modified: Option<DateTime<Utc>>,
    request: &ConditionalRequest<'_>,
) -> Result<Response, ApiError> {
    let json = serde_json::to_vec(entity)?;
    let validators = Validators::for_json(&json, last_modified);
    let freshness = validators.evaluate(request);
    tracing::debug!(
        endpoint,
        etag = %validators.etag,
        if_none_match = ?request.if_none_match.map(String::from_utf8_lossy),
        if_modified_since = ?request.if_modified_since,
        ?freshness,
        "Evaluated conditional request"
    );

    let (status, body) = match freshness {
        Freshness::NotModified => {
            metrics::record_not_modified(endpoint);
            (StatusCode::NOT_MODIFIED, Body::empty())
        }
        Freshness::Modified => (StatusCode::OK, Body::from(json)),
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    let headers = response.headers_mut();
    if status == StatusCode::OK {
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    if let Ok(value) = HeaderValue::from_str(&validators.etag) {
        headers.insert(header::ETAG, value);
    }
    if let Some(value) = validators
        .last_modified_header()
        .and_then(|v| HeaderValue::from_str(&v).ok())
    {
        headers.insert(header::LAST_MODIFIED, value);
    }
    Ok(response)
}
