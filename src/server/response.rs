use may_minihttp::Response;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::{error, warn};

use crate::dispatcher::HandlerResponse;
use crate::error::ApiError;

/// Upper bound on distinct dynamic header lines kept for the process lifetime.
const MAX_INTERNED_HEADER_LINES: usize = 1024;

pub(crate) fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

/// `may_minihttp` only accepts `&'static str` header lines. Lines are leaked once
/// and reused; the set of distinct lines is small (allow-listed origins and a few
/// fixed values), and the cap guards against anything else.
fn intern_header_line(name: &str, value: &str) -> Option<&'static str> {
    if name.contains(['\r', '\n', ':']) || value.contains(['\r', '\n']) {
        warn!(header = %name, "Dropping header with illegal characters");
        return None;
    }
    static LINES: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();
    let line = format!("{name}: {value}");
    let mut lines = LINES
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = lines.get(line.as_str()) {
        return Some(*existing);
    }
    if lines.len() >= MAX_INTERNED_HEADER_LINES {
        warn!(header = %name, "Header line cache full, dropping header");
        return None;
    }
    let leaked: &'static str = Box::leak(line.into_boxed_str());
    lines.insert(leaked);
    Some(leaked)
}

/// Write a handler response. A `Null` body means "no body"; anything else is
/// serialized as JSON with `Content-Type: application/json` unless the handler
/// set its own content type.
pub fn write_handler_response(res: &mut Response, hr: HandlerResponse) {
    res.status_code(hr.status as usize, status_reason(hr.status));

    let mut has_content_type = false;
    for (name, value) in &hr.headers {
        has_content_type |= name.eq_ignore_ascii_case("content-type");
        if let Some(line) = intern_header_line(name, value) {
            res.header(line);
        }
    }

    if hr.body.is_null() {
        return;
    }
    if !has_content_type {
        res.header("Content-Type: application/json");
    }
    match serde_json::to_vec(&hr.body) {
        Ok(bytes) => res.body_vec(bytes),
        Err(e) => {
            error!(error = %e, "Failed to encode response body");
            write_api_error(res, &ApiError::Internal);
        }
    }
}

/// Write one of the service-level error responses.
pub fn write_api_error(res: &mut Response, err: &ApiError) {
    write_json(res, err.status(), &err.body());
}

pub fn write_json(res: &mut Response, status: u16, body: &Value) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(body.to_string().into_bytes());
}
