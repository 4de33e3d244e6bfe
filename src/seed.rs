//! Initial collection loading.
//!
//! The seed file is a JSON array of movie records. Every record must carry a
//! string `id`; the remaining fields go through the same full validation as a
//! create request (so `rate` defaults to 5 and unknown keys are dropped). Ids must
//! be unique. The first problem aborts loading and names the record index.

use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::ids::MovieId;
use crate::movies::Movie;
use crate::validator::{FieldViolation, MovieValidator};

#[derive(Debug)]
pub enum SeedError {
    Io { path: PathBuf, source: std::io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    NotAnArray,
    MissingId { index: usize },
    Invalid { index: usize, violations: Vec<FieldViolation> },
    DuplicateId { index: usize, id: String },
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedError::Io { path, source } => {
                write!(f, "cannot read seed file {}: {source}", path.display())
            }
            SeedError::Json { path, source } => {
                write!(f, "seed file {} is not valid JSON: {source}", path.display())
            }
            SeedError::NotAnArray => write!(f, "seed file must contain a JSON array of movies"),
            SeedError::MissingId { index } => {
                write!(f, "seed record {index} has no string \"id\"")
            }
            SeedError::Invalid { index, violations } => {
                let details: Vec<String> = violations
                    .iter()
                    .map(|v| format!("{:?}: {}", v.path, v.message))
                    .collect();
                write!(f, "seed record {index} is invalid: {}", details.join("; "))
            }
            SeedError::DuplicateId { index, id } => {
                write!(f, "seed record {index} repeats id \"{id}\"")
            }
        }
    }
}

impl std::error::Error for SeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SeedError::Io { source, .. } => Some(source),
            SeedError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Read and validate the seed file at `path`.
///
/// # Errors
///
/// See [`SeedError`].
pub fn load_movies(path: &Path, validator: &MovieValidator) -> Result<Vec<Movie>, SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| SeedError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let movies = parse_movies(value, validator)?;
    info!(path = %path.display(), count = movies.len(), "Seed collection loaded");
    Ok(movies)
}

/// Validate an already-parsed seed document.
///
/// # Errors
///
/// See [`SeedError`].
pub fn parse_movies(value: Value, validator: &MovieValidator) -> Result<Vec<Movie>, SeedError> {
    let Value::Array(records) = value else {
        return Err(SeedError::NotAnArray);
    };

    let mut seen = HashSet::with_capacity(records.len());
    let mut movies = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let id = record
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(SeedError::MissingId { index })?;
        let new_movie = validator
            .validate_movie(&record)
            .map_err(|failure| SeedError::Invalid {
                index,
                violations: failure.violations,
            })?;
        if !seen.insert(id.clone()) {
            return Err(SeedError::DuplicateId { index, id });
        }
        movies.push(new_movie.into_movie(MovieId::from(id)));
    }
    Ok(movies)
}
