use may_minihttp::Request;
use serde_json::Value;
use std::io::{self, Read};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::dispatcher::HeaderVec;
use crate::error::ApiError;
use crate::ids::RequestId;
use crate::router::ParamVec;

/// Parsed HTTP request data used by `AppService`.
#[derive(Debug, PartialEq)]
pub struct ParsedRequest {
    pub request_id: RequestId,
    pub method: String,
    /// Request path without the query string
    pub path: String,
    /// HTTP headers (lower-case names)
    pub headers: HeaderVec,
    /// URL-decoded query string parameters
    pub query_params: ParamVec,
    /// Decoded body, or the reason it was refused
    pub body: Result<Value, ApiError>,
}

/// Parse the query string of `raw_path` (everything after `?`).
pub fn parse_query_params(raw_path: &str) -> ParamVec {
    match raw_path.split_once('?') {
        Some((_, query)) => url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (Arc::from(k.as_ref()), v.into_owned()))
            .collect(),
        None => ParamVec::new(),
    }
}

/// `true` for `application/json` and `application/*+json` media types.
pub fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Apply the JSON body contract to raw body bytes.
///
/// - non-JSON content type or empty body → `{}`
/// - JSON that parses to an object or array → that value
/// - anything else → [`ApiError::MalformedBody`]
pub fn decode_body(content_type: Option<&str>, bytes: &[u8]) -> Result<Value, ApiError> {
    let is_json = content_type.is_some_and(is_json_content_type);
    if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Ok(value),
        Ok(_) => {
            debug!("JSON body is not an object or array");
            Err(ApiError::MalformedBody)
        }
        Err(e) => {
            debug!(error = %e, "JSON body parse failed");
            Err(ApiError::MalformedBody)
        }
    }
}

/// Read at most `limit` bytes of `body`. Anything beyond is drained and
/// reported as [`ApiError::PayloadTooLarge`].
pub fn read_limited_body<R: Read>(mut body: R, limit: usize) -> Result<Vec<u8>, ApiError> {
    let mut buf = Vec::new();
    let read = (&mut body)
        .take(limit as u64 + 1)
        .read_to_end(&mut buf);
    if let Err(e) = read {
        warn!(error = %e, "Failed to read request body");
        return Err(ApiError::MalformedBody);
    }
    if buf.len() > limit {
        // Keep the connection in sync for the next request.
        let drained = io::copy(&mut body, &mut io::sink()).unwrap_or(0);
        warn!(limit, received = buf.len() as u64 + drained, "Request body too large");
        return Err(ApiError::PayloadTooLarge { limit });
    }
    Ok(buf)
}

/// Extract everything the service needs from a `may_minihttp::Request`.
pub fn parse_request(req: Request, max_body_bytes: usize) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::from(h.name.to_ascii_lowercase().as_str()),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();
    let header = |name: &str| {
        headers
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    };

    let request_id = RequestId::from_header_or_new(header("x-request-id"));
    let query_params = parse_query_params(&raw_path);
    let content_type = header("content-type").map(str::to_string);

    let body = read_limited_body(req.body(), max_body_bytes)
        .and_then(|bytes| decode_body(content_type.as_deref(), &bytes));

    debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        headers_count = headers.len(),
        query_count = query_params.len(),
        body_ok = body.is_ok(),
        "HTTP request parsed"
    );

    ParsedRequest {
        request_id,
        method,
        path,
        headers,
        query_params,
        body,
    }
}
