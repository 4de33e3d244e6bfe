//! Error taxonomy of the movie API and its mapping onto JSON responses.
//!
//! | Variant | Status | Body |
//! |---|---|---|
//! | `Validation` | 400 | `{"error": [violations]}` |
//! | `NotFound` | 404 | `{"message": "Movie not found"}` |
//! | `MalformedBody` | 400 | `{"error": "Invalid JSON body"}` |
//! | `PayloadTooLarge` | 413 | `{"error": "Request body too large"}` |
//! | `RouteNotFound` | 404 | `{"error": "Not Found", "method", "path"}` |
//! | `Internal` | 500 | `{"error": "Internal Server Error"}` |
//!
//! A CORS rejection is not an error: the origin header is simply omitted.

use serde_json::{json, Value};
use std::fmt;

use crate::validator::{FieldViolation, ValidationFailure};

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The payload broke one or more field rules.
    Validation(Vec<FieldViolation>),
    /// No movie with the requested id.
    NotFound,
    /// The body could not be parsed as a JSON object or array.
    MalformedBody,
    /// The body exceeded the configured limit.
    PayloadTooLarge { limit: usize },
    /// No route matched method and path.
    RouteNotFound { method: String, path: String },
    /// Handler crashed or was never registered. Details stay in the logs.
    Internal,
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody => 400,
            ApiError::NotFound | ApiError::RouteNotFound { .. } => 404,
            ApiError::PayloadTooLarge { .. } => 413,
            ApiError::Internal => 500,
        }
    }

    /// JSON body sent to the client.
    #[must_use]
    pub fn body(&self) -> Value {
        match self {
            ApiError::Validation(violations) => json!({ "error": violations }),
            ApiError::NotFound => json!({ "message": "Movie not found" }),
            ApiError::MalformedBody => json!({ "error": "Invalid JSON body" }),
            ApiError::PayloadTooLarge { .. } => json!({ "error": "Request body too large" }),
            ApiError::RouteNotFound { method, path } => {
                json!({ "error": "Not Found", "method": method, "path": path })
            }
            ApiError::Internal => json!({ "error": "Internal Server Error" }),
        }
    }
}

impl From<ValidationFailure> for ApiError {
    fn from(failure: ValidationFailure) -> Self {
        ApiError::Validation(failure.violations)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(violations) => {
                write!(f, "validation failed with {} violation(s)", violations.len())
            }
            ApiError::NotFound => write!(f, "movie not found"),
            ApiError::MalformedBody => write!(f, "request body is not valid JSON"),
            ApiError::PayloadTooLarge { limit } => {
                write!(f, "request body exceeds the {limit} byte limit")
            }
            ApiError::RouteNotFound { method, path } => write!(f, "no route for {method} {path}"),
            ApiError::Internal => write!(f, "internal server error"),
        }
    }
}

impl std::error::Error for ApiError {}
