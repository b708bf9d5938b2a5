//! Error responses.
//!
//! Every failed request answers with `{"error": CODE, "message": ...}` and
//! the status the domain error maps to. Server-side failures are logged and
//! answered with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tally_core::accounts::TaxonomyError;
use tally_core::items::ItemError;
use tally_core::reports::ReportError;
use tally_shared::AppError;
use tracing::error;

/// A domain error that can be rendered as an API response.
pub trait ApiError: std::fmt::Display {
    /// HTTP status code.
    fn status(&self) -> u16;

    /// Machine-readable error code.
    fn code(&self) -> &'static str;

    /// Extra fields merged into the response body.
    fn details(&self) -> Option<Value> {
        None
    }
}

impl ApiError for ItemError {
    fn status(&self) -> u16 {
        self.http_status_code()
    }

    fn code(&self) -> &'static str {
        self.error_code()
    }

    fn details(&self) -> Option<Value> {
        match self {
            Self::ItemsNotFound(ids) => Some(json!({ "ids": ids })),
            _ => None,
        }
    }
}

impl ApiError for ReportError {
    fn status(&self) -> u16 {
        self.http_status_code()
    }

    fn code(&self) -> &'static str {
        self.error_code()
    }
}

impl ApiError for TaxonomyError {
    fn status(&self) -> u16 {
        404
    }

    fn code(&self) -> &'static str {
        self.error_code()
    }
}

impl ApiError for AppError {
    fn status(&self) -> u16 {
        self.status_code()
    }

    fn code(&self) -> &'static str {
        self.error_code()
    }
}

/// Renders a domain error as a JSON response.
pub fn error_response<E: ApiError + ?Sized>(e: &E) -> Response {
    let status = StatusCode::from_u16(e.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if status.is_server_error() {
        error!(error = %e, code = e.code(), "Request failed");
        "An internal error occurred".to_string()
    } else {
        e.to_string()
    };

    let mut body = json!({
        "error": e.code(),
        "message": message,
    });
    if let (Some(Value::Object(extra)), Value::Object(map)) = (e.details(), &mut body) {
        map.extend(extra);
    }

    (status, Json(body)).into_response()
}

/// Renders request validation failures.
pub fn validation_response(errors: &validator::ValidationErrors) -> Response {
    error_response(&AppError::Validation(errors.to_string()))
}
