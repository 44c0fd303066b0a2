//! JSON error responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use crate::Error;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An error on its way out of a handler: status code plus the message the
/// client sees as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Map a store error that the handler has no specific answer for.
    /// Validation keeps its own message; anything else is logged and hidden
    /// behind `context`.
    pub fn from_store(err: Error, context: &str) -> Self {
        match err {
            Error::Validation(msg) => Self::bad_request(msg),
            Error::NotFound(msg) => Self::not_found(msg),
            Error::Conflict(msg) => Self::conflict(msg),
            other => {
                tracing::error!("{}: {}", context, other);
                Self::internal(context)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

/// `.map_err(store_error("Error retrieving friends"))`
pub fn store_error(context: &'static str) -> impl Fn(Error) -> ApiError {
    move |err| ApiError::from_store(err, context)
}
