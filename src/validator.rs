//! # Schema Validator
//!
//! Boundary validation for movie payloads. Request bodies arrive as untyped JSON;
//! this module checks them against a JSON Schema (draft-07, compiled once with the
//! `jsonschema` crate), checks that `poster` parses as a URL, and only then turns
//! them into typed values ([`NewMovie`] / [`MoviePatch`]).
//!
//! Two modes share the same per-field rules:
//!
//! - **full** (create): `title`, `year`, `director`, `duration`, `poster` and
//!   `genre` are required; `rate` defaults to [`DEFAULT_RATE`](crate::movies::DEFAULT_RATE).
//! - **partial** (update): every field is optional and nothing is defaulted.
//!
//! A failure carries every violation the validator reported, each addressed by its
//! field path, e.g.
//!
//! ```json
//! { "path": ["genre", 0], "code": "enum", "message": "\"Romance\" is not one of [...]" }
//! ```

use jsonschema::error::ValidationErrorKind;
use jsonschema::JSONSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use tracing::debug;

use crate::movies::{Genre, MoviePatch, NewMovie};

pub const MIN_YEAR: i64 = 1900;
pub const MAX_YEAR: i64 = 2100;
pub const MIN_RATE: f64 = 0.0;
pub const MAX_RATE: f64 = 10.0;

/// Fields typed as integers in the schema.
const INTEGER_FIELDS: [&str; 2] = ["year", "duration"];

/// One element of a violation's field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        PathSegment::Key(value.to_string())
    }
}

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    /// Location of the offending value; empty for the body itself.
    pub path: Vec<PathSegment>,
    /// Rule that failed (the schema keyword, or `url` / `type`).
    pub code: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(path: Vec<PathSegment>, code: impl Into<String>, message: impl Into<String>) -> Self {
        FieldViolation {
            path,
            code: code.into(),
            message: message.into(),
        }
    }

    /// `true` when the violation points at the top-level field `name`.
    #[must_use]
    pub fn is_field(&self, name: &str) -> bool {
        matches!(self.path.first(), Some(PathSegment::Key(k)) if k == name)
    }
}

/// Validation outcome for a rejected payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub violations: Vec<FieldViolation>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field violation(s)", self.violations.len())
    }
}

impl std::error::Error for ValidationFailure {}

/// A built-in schema failed to compile. Only reachable at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCompileError {
    pub schema: &'static str,
    pub reason: String,
}

impl fmt::Display for SchemaCompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to compile {} schema: {}", self.schema, self.reason)
    }
}

impl std::error::Error for SchemaCompileError {}

fn movie_properties() -> Value {
    let genres: Vec<&str> = Genre::ALL.iter().map(Genre::as_str).collect();
    json!({
        "title": { "type": "string", "minLength": 1 },
        "year": { "type": "integer", "minimum": MIN_YEAR, "maximum": MAX_YEAR },
        "director": { "type": "string", "minLength": 1 },
        "duration": { "type": "integer", "exclusiveMinimum": 0, "maximum": u32::MAX },
        "rate": { "type": "number", "minimum": MIN_RATE, "maximum": MAX_RATE },
        "poster": { "type": "string" },
        "genre": {
            "type": "array",
            "minItems": 1,
            "items": { "type": "string", "enum": genres }
        }
    })
}

/// Schema for create payloads.
#[must_use]
pub fn movie_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": movie_properties(),
        "required": ["title", "year", "director", "duration", "poster", "genre"]
    })
}

/// Schema for partial update payloads.
#[must_use]
pub fn partial_movie_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": movie_properties()
    })
}

fn compile(name: &'static str, schema: &Value) -> Result<JSONSchema, SchemaCompileError> {
    JSONSchema::compile(schema).map_err(|e| SchemaCompileError {
        schema: name,
        reason: e.to_string(),
    })
}

/// Split a JSON pointer (`/genre/0`) into path segments.
fn pointer_segments(pointer: &str) -> Vec<PathSegment> {
    pointer
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<usize>() {
            Ok(idx) => PathSegment::Index(idx),
            Err(_) => PathSegment::Key(s.replace("~1", "/").replace("~0", "~")),
        })
        .collect()
}

/// Compiled full and partial movie schemas.
pub struct MovieValidator {
    full: JSONSchema,
    partial: JSONSchema,
}

impl fmt::Debug for MovieValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MovieValidator").finish_non_exhaustive()
    }
}

impl MovieValidator {
    /// Compile both schemas.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaCompileError`] if a built-in schema is rejected by the
    /// validator engine.
    pub fn new() -> Result<Self, SchemaCompileError> {
        Ok(Self {
            full: compile("movie", &movie_schema())?,
            partial: compile("partial movie", &partial_movie_schema())?,
        })
    }

    /// Full validation for create.
    ///
    /// # Errors
    ///
    /// Returns every field violation found in `body`.
    pub fn validate_movie(&self, body: &Value) -> Result<NewMovie, ValidationFailure> {
        check(&self.full, body)
    }

    /// Partial validation for update.
    ///
    /// # Errors
    ///
    /// Returns every field violation found in `body`.
    pub fn validate_partial_movie(&self, body: &Value) -> Result<MoviePatch, ValidationFailure> {
        check(&self.partial, body)
    }
}

fn check<T: DeserializeOwned>(schema: &JSONSchema, body: &Value) -> Result<T, ValidationFailure> {
    let mut violations: Vec<FieldViolation> = match schema.validate(body) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|error| {
                let mut path = pointer_segments(&error.instance_path.to_string());
                if let ValidationErrorKind::Required { property } = &error.kind {
                    if let Some(name) = property.as_str() {
                        path.push(PathSegment::from(name));
                    }
                }
                let schema_path = error.schema_path.to_string();
                let code = schema_path
                    .rsplit('/')
                    .next()
                    .filter(|s| !s.is_empty())
                    .unwrap_or("schema")
                    .to_string();
                FieldViolation::new(path, code, error.to_string())
            })
            .collect(),
    };

    if let Some(poster) = body.get("poster").and_then(Value::as_str) {
        if url::Url::parse(poster).is_err() && !violations.iter().any(|v| v.is_field("poster")) {
            violations.push(FieldViolation::new(
                vec![PathSegment::from("poster")],
                "url",
                "Poster must be a valid URL",
            ));
        }
    }

    if !violations.is_empty() {
        debug!(violation_count = violations.len(), "Payload rejected by schema");
        return Err(ValidationFailure { violations });
    }

    let body = normalize_integers(body);
    serde_json::from_value(body.clone()).map_err(|e| ValidationFailure {
        violations: conversion_violations(&body, &e),
    })
}

/// Rewrite integral floats (`2000.0`) in integer fields as integers. The schema
/// has already rejected fractional values.
fn normalize_integers(body: &Value) -> Value {
    let mut body = body.clone();
    if let Some(fields) = body.as_object_mut() {
        for name in INTEGER_FIELDS {
            let Some(value) = fields.get_mut(name) else {
                continue;
            };
            if let Some(n) = value.as_f64().filter(|n| n.fract() == 0.0) {
                if value.is_f64() {
                    *value = json!(n as i64);
                }
            }
        }
    }
    body
}

/// Attribute a typed conversion failure to the fields that cause it, checking
/// each field on its own against the all-optional patch shape.
fn conversion_violations(body: &Value, err: &serde_json::Error) -> Vec<FieldViolation> {
    let per_field: Vec<FieldViolation> = body
        .as_object()
        .into_iter()
        .flatten()
        .filter_map(|(name, value)| {
            let single = json!({ name.as_str(): value });
            serde_json::from_value::<MoviePatch>(single)
                .err()
                .map(|e| FieldViolation::new(vec![PathSegment::from(name.as_str())], "type", e.to_string()))
        })
        .collect();
    if per_field.is_empty() {
        vec![FieldViolation::new(Vec::new(), "type", err.to_string())]
    } else {
        per_field
    }
}
